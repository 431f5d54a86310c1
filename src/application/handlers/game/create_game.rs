//! CreateGameHandler - Host opens a lobby for one of their quizzes.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{
    CommandMetadata, EventId, KahootId, SessionId, Timestamp, UserId,
};
use crate::domain::game::{
    GameError, GameSessionCreated, GameStateView, QrToken, SessionFactory, SessionPin,
};
use crate::domain::services::PinGenerator;
use crate::ports::{EventPublisher, QuizRepository, SessionStore};

use super::support::{envelope, load_quiz, state_updated};

#[derive(Debug, Clone)]
pub struct CreateGameCommand {
    pub host_id: UserId,
    pub kahoot_id: KahootId,
}

#[derive(Debug, Clone)]
pub struct CreateGameResult {
    pub session_id: SessionId,
    pub pin: SessionPin,
    /// Scan-to-join token minted with the session.
    pub qr_token: QrToken,
    pub view: GameStateView,
}

pub struct CreateGameHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
    pins: PinGenerator,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateGameHandler {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn SessionStore>,
        pins: PinGenerator,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            quizzes,
            sessions,
            pins,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateGameCommand,
        metadata: &CommandMetadata,
    ) -> Result<CreateGameResult, GameError> {
        // 1. Load quiz content
        let quiz = load_quiz(self.quizzes.as_ref(), &cmd.kahoot_id).await?;

        // 2. Claim a PIN, giving it back if the session never materializes
        let pin = self.pins.generate().await?;
        let session = match SessionFactory::create_for_quiz(quiz.as_ref(), cmd.host_id, pin.clone())
        {
            Ok(session) => session,
            Err(err) => {
                self.release(&pin).await;
                return Err(err);
            }
        };

        let session_id = session.id();
        let host_id = session.host_id().clone();
        let view = GameStateView::of(&session, quiz.as_ref());
        let state_event = state_updated(&session, quiz.as_ref(), metadata);

        // 3. Register in the live store
        let qr_token = match self.sessions.save(session).await {
            Ok(token) => token,
            Err(err) => {
                self.release(&pin).await;
                return Err(err.into());
            }
        };

        info!(pin = %pin, session_id = %session_id, host_id = %host_id, "Game session created");

        // 4. Publish
        let created = GameSessionCreated {
            event_id: EventId::new(),
            session_id,
            pin: pin.to_string(),
            host_id,
            reconnect_token: qr_token.to_string(),
            created_at: Timestamp::now(),
        };
        self.event_publisher
            .publish_all(vec![envelope(&created, metadata), state_event])
            .await?;

        Ok(CreateGameResult {
            session_id,
            pin,
            qr_token,
            view,
        })
    }

    async fn release(&self, pin: &SessionPin) {
        if let Err(err) = self.pins.release(pin).await {
            warn!(pin = %pin, error = %err, "Failed to release PIN of abandoned session");
        }
    }
}
