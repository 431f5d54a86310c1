//! AdvancePhaseHandler - Host moves the game to its next phase.
//!
//! - `Question`: unanswered players time out, the slide closes and scores
//!   are applied (`Results`)
//! - `Results`: the next slide opens, or the game ends, is archived and
//!   leaves the live store

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{CommandMetadata, EventEnvelope, EventId, Timestamp, UserId};
use crate::domain::game::{
    GameEnded, GameError, GameSession, GameState, Scoreboard, SessionPin, SlideResult,
};
use crate::domain::quiz::{PublicSlide, QuizContent};
use crate::domain::services::{ProgressRankingService, SubmissionEvaluationService};
use crate::ports::{EventPublisher, QuizRepository, SessionArchiveRepository, SessionStore};

use super::support::{
    current_slide, envelope, load_quiz, load_session, question_results, question_started,
    state_updated,
};

#[derive(Debug, Clone)]
pub struct AdvancePhaseCommand {
    pub pin: SessionPin,
    pub host_id: UserId,
}

#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    QuestionClosed {
        result: SlideResult,
        /// Players who never answered and were scored as timed out.
        timed_out: usize,
    },
    QuestionOpened {
        slide: PublicSlide,
    },
    GameEnded {
        scoreboard: Scoreboard,
        /// False when the archive already held this session or was unreachable.
        archived: bool,
    },
}

#[derive(Debug, Clone)]
pub struct AdvancePhaseResult {
    pub state: GameState,
    pub outcome: AdvanceOutcome,
}

pub struct AdvancePhaseHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
    archive: Arc<dyn SessionArchiveRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AdvancePhaseHandler {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        sessions: Arc<dyn SessionStore>,
        archive: Arc<dyn SessionArchiveRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            quizzes,
            sessions,
            archive,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: AdvancePhaseCommand,
        metadata: &CommandMetadata,
    ) -> Result<AdvancePhaseResult, GameError> {
        let handle = load_session(self.sessions.as_ref(), &cmd.pin).await?;
        let mut session = handle.lock().await;
        session.authorize_host(&cmd.host_id)?;
        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;

        let (outcome, events) = if session.state() == GameState::Question {
            Self::close_question(&mut session, quiz.as_ref(), metadata)?
        } else {
            match session.advance_to_next_phase()? {
                GameState::Question => Self::open_question(&session, quiz.as_ref(), metadata)?,
                GameState::End => self.finish(&session, quiz.as_ref(), metadata).await?,
                other => {
                    return Err(GameError::consistency(format!(
                        "advance from RESULTS landed in {}",
                        other
                    )))
                }
            }
        };
        let state = session.state();
        drop(session);

        self.event_publisher.publish_all(events).await?;
        Ok(AdvancePhaseResult { state, outcome })
    }

    fn close_question(
        session: &mut GameSession,
        quiz: &dyn QuizContent,
        metadata: &CommandMetadata,
    ) -> Result<(AdvanceOutcome, Vec<EventEnvelope>), GameError> {
        let closing = current_slide(session, quiz)?;
        let timed_out = SubmissionEvaluationService::record_timeouts(session, quiz)?;
        ProgressRankingService::close_current_slide(session, quiz)?;

        let result = session.slide_result(&closing.id).cloned().ok_or_else(|| {
            GameError::consistency(format!("slide {} closed without a result", closing.id))
        })?;

        info!(
            pin = %session.pin(),
            slide_id = %closing.id,
            answers = result.len(),
            timed_out,
            "Question closed"
        );

        let events = vec![
            question_results(session, &closing, metadata),
            state_updated(session, quiz, metadata),
        ];
        Ok((AdvanceOutcome::QuestionClosed { result, timed_out }, events))
    }

    fn open_question(
        session: &GameSession,
        quiz: &dyn QuizContent,
        metadata: &CommandMetadata,
    ) -> Result<(AdvanceOutcome, Vec<EventEnvelope>), GameError> {
        let slide = current_slide(session, quiz)?;

        info!(
            pin = %session.pin(),
            slide_id = %slide.id,
            position = slide.position,
            "Question opened"
        );

        let events = vec![
            question_started(session, &slide, metadata),
            state_updated(session, quiz, metadata),
        ];
        Ok((
            AdvanceOutcome::QuestionOpened {
                slide: slide.without_answer_key(),
            },
            events,
        ))
    }

    /// Archives the ended session once and removes it from the live store.
    async fn finish(
        &self,
        session: &GameSession,
        quiz: &dyn QuizContent,
        metadata: &CommandMetadata,
    ) -> Result<(AdvanceOutcome, Vec<EventEnvelope>), GameError> {
        session.validate_all_invariants_for_completion()?;
        let pin = session.pin().clone();

        let last_activity = self
            .sessions
            .last_activity(&pin)
            .await?
            .unwrap_or_else(Timestamp::now);
        let snapshot = session.to_archive(last_activity);

        let archived = match self.archive.archive_session(&snapshot).await {
            Ok(true) => {
                info!(
                    pin = %pin,
                    session_id = %session.id(),
                    submissions = snapshot.submission_count(),
                    "Game archived"
                );
                true
            }
            Ok(false) => {
                warn!(pin = %pin, session_id = %session.id(), "Game was already archived");
                false
            }
            Err(err) => {
                warn!(pin = %pin, session_id = %session.id(), error = %err, "Archiving failed");
                false
            }
        };

        self.sessions.delete(&pin).await?;

        let scoreboard = session.ranking().clone();
        let ended = GameEnded {
            event_id: EventId::new(),
            session_id: session.id(),
            pin: pin.to_string(),
            scoreboard: scoreboard.entries().to_vec(),
            winner: scoreboard.winner().cloned(),
            ended_at: session.completed_at().unwrap_or_else(Timestamp::now),
        };

        info!(
            pin = %pin,
            session_id = %session.id(),
            winner = ?scoreboard.winner().map(|w| w.nickname.as_str()),
            "Game ended"
        );

        let events = vec![envelope(&ended, metadata), state_updated(session, quiz, metadata)];
        Ok((
            AdvanceOutcome::GameEnded {
                scoreboard,
                archived,
            },
            events,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::game::testing::{display, question, Harness};

    #[tokio::test]
    async fn closing_scores_and_ranks_players() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;
        let ada = harness.join(&game.pin, "Ada").await;
        let bob = harness.join(&game.pin, "Bob").await;
        harness.start(&game.pin).await;
        harness
            .submit(&game.pin, ada, harness.slide_id(0), vec![0], 10_000)
            .await
            .unwrap();
        harness
            .submit(&game.pin, bob, harness.slide_id(0), vec![2], 5_000)
            .await
            .unwrap();

        let result = harness.advance(&game.pin).await.unwrap();

        assert_eq!(result.state, GameState::Results);
        let AdvanceOutcome::QuestionClosed { result, timed_out } = result.outcome else {
            panic!("expected a closed question");
        };
        assert_eq!(timed_out, 0);
        assert_eq!(result.len(), 2);

        let published = harness.events.events_of_type("game.question_results.v1");
        let payload = &published[0].payload;
        assert_eq!(payload["correct_indices"], serde_json::json!([0]));
        assert_eq!(payload["scoreboard"][0]["player_id"], ada.to_string());
        assert_eq!(payload["scoreboard"][0]["score"], 750);
        assert_eq!(payload["scoreboard"][1]["rank"], 2);
    }

    #[tokio::test]
    async fn silent_players_time_out_with_zero() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;
        let ada = harness.join(&game.pin, "Ada").await;
        harness.start(&game.pin).await;

        let result = harness.advance(&game.pin).await.unwrap();

        let AdvanceOutcome::QuestionClosed { result, timed_out } = result.outcome else {
            panic!("expected a closed question");
        };
        assert_eq!(timed_out, 1);
        let answer = result.answer_for(&ada).unwrap();
        assert!(!answer.is_correct);
        assert_eq!(answer.score, 0);
        assert!(answer.selected.is_empty());
        assert_eq!(answer.response_time_ms, 20_000);
    }

    #[tokio::test]
    async fn results_open_the_next_question() {
        let harness = Harness::with_questions(2).await;
        let game = harness.create_game().await;
        harness.join(&game.pin, "Ada").await;
        harness.start(&game.pin).await;
        harness.advance(&game.pin).await.unwrap();

        let result = harness.advance(&game.pin).await.unwrap();

        assert_eq!(result.state, GameState::Question);
        let AdvanceOutcome::QuestionOpened { slide } = result.outcome else {
            panic!("expected an opened question");
        };
        assert_eq!(slide.id, harness.slide_id(1));
        assert_eq!(harness.events.events_of_type("game.question_started.v1").len(), 2);
    }

    #[tokio::test]
    async fn last_results_end_archive_and_evict_the_game() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;
        let ada = harness.join(&game.pin, "Ada").await;
        harness.start(&game.pin).await;
        harness
            .submit(&game.pin, ada, harness.slide_id(0), vec![0], 0)
            .await
            .unwrap();
        harness.advance(&game.pin).await.unwrap();

        let result = harness.advance(&game.pin).await.unwrap();

        assert_eq!(result.state, GameState::End);
        let AdvanceOutcome::GameEnded { scoreboard, archived } = result.outcome else {
            panic!("expected the game to end");
        };
        assert!(archived);
        assert_eq!(scoreboard.winner().map(|w| w.player_id), Some(ada));

        let snapshot = harness.archive.get(&game.session_id).await.unwrap();
        assert_eq!(snapshot.state, GameState::End);
        assert_eq!(snapshot.submission_count(), 1);
        assert_eq!(snapshot.slide_results[0].submissions[0].score, 1000);

        assert_eq!(harness.sessions.count().await.unwrap(), 0);
        assert!(!harness.pins.contains(&game.pin).await);

        let ended = harness.events.events_of_type("game.ended.v1");
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].payload["winner"]["nickname"], "Ada");
    }

    #[tokio::test]
    async fn display_slide_closes_with_an_empty_result() {
        let harness = Harness::new(vec![display(), question(500, 10)]).await;
        let game = harness.create_game().await;
        let ada = harness.join(&game.pin, "Ada").await;
        harness.start(&game.pin).await;

        let rejected = harness
            .submit(&game.pin, ada, harness.slide_id(0), vec![0], 100)
            .await;
        assert!(matches!(rejected, Err(GameError::InvalidState(_))));

        let result = harness.advance(&game.pin).await.unwrap();
        let AdvanceOutcome::QuestionClosed { result, timed_out } = result.outcome else {
            panic!("expected a closed question");
        };
        assert!(result.is_empty());
        assert_eq!(timed_out, 0);
    }

    #[tokio::test]
    async fn advancing_from_lobby_is_invalid_state() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;

        let result = harness.advance(&game.pin).await;

        assert!(matches!(result, Err(GameError::InvalidState(_))));
    }

    #[tokio::test]
    async fn only_the_host_may_advance() {
        let harness = Harness::with_questions(1).await;
        let game = harness.create_game().await;
        harness.start(&game.pin).await;

        let result = harness
            .advance_handler()
            .handle(
                AdvancePhaseCommand {
                    pin: game.pin.clone(),
                    host_id: UserId::new("intruder").unwrap(),
                },
                &harness.metadata(),
            )
            .await;

        assert!(matches!(result, Err(GameError::Unauthorized(_))));
    }
}
