//! JoinGameHandler - A player enters a lobby by PIN.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{CommandMetadata, PlayerId};
use crate::domain::game::{GameError, GameStateView, PlayerFactory, PlayerIdentity, SessionPin};
use crate::ports::{EventPublisher, QuizRepository, SessionStore};

use super::support::{load_quiz, load_session, state_updated};

#[derive(Debug, Clone)]
pub struct JoinGameCommand {
    pub pin: SessionPin,
    pub identity: PlayerIdentity,
    pub nickname: String,
}

#[derive(Debug, Clone)]
pub struct JoinGameResult {
    pub player_id: PlayerId,
    pub view: GameStateView,
}

pub struct JoinGameHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
    players: PlayerFactory,
    event_publisher: Arc<dyn EventPublisher>,
}

impl JoinGameHandler {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn SessionStore>,
        players: PlayerFactory,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            quizzes,
            sessions,
            players,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: JoinGameCommand,
        metadata: &CommandMetadata,
    ) -> Result<JoinGameResult, GameError> {
        let player = match cmd.identity {
            PlayerIdentity::Registered(user_id) => {
                self.players.for_registered(user_id, &cmd.nickname)?
            }
            PlayerIdentity::Guest(guest_id) => self.players.for_guest(guest_id, &cmd.nickname)?,
        };
        let player_id = player.id();

        let handle = load_session(self.sessions.as_ref(), &cmd.pin).await?;
        let mut session = handle.lock().await;
        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;

        if let Err(err) = session.join_player(player) {
            warn!(pin = %cmd.pin, nickname = %cmd.nickname, error = %err, "Join rejected");
            return Err(err);
        }

        let view = GameStateView::of(&session, quiz.as_ref());
        let event = state_updated(&session, quiz.as_ref(), metadata);
        drop(session);

        info!(pin = %cmd.pin, player_id = %player_id, players = view.players.len(), "Player joined");
        self.event_publisher.publish(event).await?;

        Ok(JoinGameResult { player_id, view })
    }
}
