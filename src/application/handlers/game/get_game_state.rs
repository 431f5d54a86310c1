//! GetGameStateHandler - Public view of a live session.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::game::{GameError, GameStateView, SessionPin};
use crate::ports::{QuizRepository, SessionStore};

use super::support::{load_quiz, load_session};

#[derive(Debug, Clone)]
pub struct GetGameStateQuery {
    pub pin: SessionPin,
}

pub struct GetGameStateHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
}

impl GetGameStateHandler {
    pub fn new(quizzes: Arc<dyn QuizRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { quizzes, sessions }
    }

    pub async fn handle(
        &self,
        query: GetGameStateQuery,
        _metadata: &CommandMetadata,
    ) -> Result<GameStateView, GameError> {
        let handle = load_session(self.sessions.as_ref(), &query.pin).await?;
        let session = handle.lock().await;
        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;
        Ok(GameStateView::of(&session, quiz.as_ref()))
    }
}
