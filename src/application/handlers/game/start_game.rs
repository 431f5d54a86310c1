//! StartGameHandler - Host opens the first question.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, UserId};
use crate::domain::game::{GameError, GameStateView, SessionPin};
use crate::domain::quiz::PublicSlide;
use crate::ports::{EventPublisher, QuizRepository, SessionStore};

use super::support::{current_slide, load_quiz, load_session, question_started, state_updated};

#[derive(Debug, Clone)]
pub struct StartGameCommand {
    pub pin: SessionPin,
    pub host_id: UserId,
}

#[derive(Debug, Clone)]
pub struct StartGameResult {
    pub slide: PublicSlide,
    pub view: GameStateView,
}

pub struct StartGameHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl StartGameHandler {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn SessionStore>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            quizzes,
            sessions,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartGameCommand,
        metadata: &CommandMetadata,
    ) -> Result<StartGameResult, GameError> {
        let handle = load_session(self.sessions.as_ref(), &cmd.pin).await?;
        let mut session = handle.lock().await;
        session.authorize_host(&cmd.host_id)?;

        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;
        let slide = current_slide(&session, quiz.as_ref())?;
        session.start_session()?;

        let events = vec![
            question_started(&session, &slide, metadata),
            state_updated(&session, quiz.as_ref(), metadata),
        ];
        let view = GameStateView::of(&session, quiz.as_ref());
        drop(session);

        info!(pin = %cmd.pin, players = view.players.len(), "Game started");
        self.event_publisher.publish_all(events).await?;

        Ok(StartGameResult {
            slide: slide.without_answer_key(),
            view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::game::testing::Harness;
    use crate::domain::game::GameState;

    #[tokio::test]
    async fn host_opens_first_question_without_answer_key() {
        let harness = Harness::with_questions(2).await;
        let game = harness.create_game().await;
        harness.join(&game.pin, "Ada").await;

        let result = harness
            .start_handler()
            .handle(
                StartGameCommand {
                    pin: game.pin.clone(),
                    host_id: harness.host.clone(),
                },
                &harness.metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.view.state, GameState::Question);
        assert_eq!(result.slide.id, harness.slide_id(0));
        assert_eq!(result.view.current_slide.as_ref().map(|s| s.id), Some(harness.slide_id(0)));

        let started = harness.events.events_of_type("game.question_started.v1");
        assert_eq!(started.len(), 1);
        assert!(started[0].payload["slide"]["options"][0].get("is_correct").is_none());
    }

    #[tokio::test]
    async fn only_the_host_may_start() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;

        let result = harness
            .start_handler()
            .handle(
                StartGameCommand {
                    pin: game.pin.clone(),
                    host_id: UserId::new("player-7").unwrap(),
                },
                &harness.metadata(),
            )
            .await;

        assert!(matches!(result, Err(GameError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn starting_twice_is_invalid_state() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;
        harness.start(&game.pin).await;

        let result = harness
            .start_handler()
            .handle(
                StartGameCommand {
                    pin: game.pin.clone(),
                    host_id: harness.host.clone(),
                },
                &harness.metadata(),
            )
            .await;

        assert!(matches!(result, Err(GameError::InvalidState(_))));
    }
}
