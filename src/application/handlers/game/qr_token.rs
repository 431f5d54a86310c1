//! QR token handlers - scan-to-join and reconnect.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::game::{GameError, GameStateView, QrToken, SessionPin};
use crate::ports::{QuizRepository, SessionStore};

use super::support::{load_quiz, load_session};

/// Mints a fresh token for a live session.
#[derive(Debug, Clone)]
pub struct IssueQrTokenCommand {
    pub pin: SessionPin,
    pub host_id: UserId,
}

pub struct IssueQrTokenHandler {
    sessions: Arc<dyn SessionStore>,
}

impl IssueQrTokenHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(
        &self,
        cmd: IssueQrTokenCommand,
        _metadata: &CommandMetadata,
    ) -> Result<QrToken, GameError> {
        let handle = load_session(self.sessions.as_ref(), &cmd.pin).await?;
        handle.lock().await.authorize_host(&cmd.host_id)?;

        let token = self
            .sessions
            .issue_qr_token(&cmd.pin)
            .await?
            .ok_or_else(|| GameError::not_found("Session", &cmd.pin))?;

        info!(pin = %cmd.pin, "QR token issued");
        Ok(token)
    }
}

#[derive(Debug, Clone)]
pub struct ResolveQrTokenQuery {
    pub token: QrToken,
}

#[derive(Debug, Clone)]
pub struct ResolveQrTokenResult {
    pub pin: SessionPin,
    pub view: GameStateView,
}

pub struct ResolveQrTokenHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
}

impl ResolveQrTokenHandler {
    pub fn new(quizzes: Arc<dyn QuizRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { quizzes, sessions }
    }

    /// # Errors
    ///
    /// - `NotFound` if the token is unknown, expired, or its session is gone
    pub async fn handle(
        &self,
        query: ResolveQrTokenQuery,
        _metadata: &CommandMetadata,
    ) -> Result<ResolveQrTokenResult, GameError> {
        let pin = self
            .sessions
            .find_by_qr_token(&query.token)
            .await?
            .ok_or_else(|| GameError::not_found("QrToken", &query.token))?;

        let handle = load_session(self.sessions.as_ref(), &pin).await?;
        let session = handle.lock().await;
        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;
        let view = GameStateView::of(&session, quiz.as_ref());

        debug!(pin = %pin, state = %view.state, "QR token resolved");
        Ok(ResolveQrTokenResult { pin, view })
    }
}
