//! SubmitSoloAnswersHandler - Closes a slide from a batch of answers.
//!
//! Solo play has no live pacing: the client collects every answer for the
//! open slide and sends them at once. The slide is closed and progress moves
//! to the next slide in the same step.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CommandMetadata, PlayerId, UserId};
use crate::domain::game::{GameError, GameState, SessionPin, SlideResult};
use crate::domain::quiz::Submission;
use crate::domain::services::SubmissionEvaluationService;
use crate::ports::{EventPublisher, QuizRepository, SessionStore};

use super::support::{current_slide, load_quiz, load_session, question_results, state_updated};

#[derive(Debug, Clone)]
pub struct SubmitSoloAnswersCommand {
    pub pin: SessionPin,
    pub host_id: UserId,
    pub submissions: Vec<(PlayerId, Submission)>,
}

#[derive(Debug, Clone)]
pub struct SubmitSoloAnswersResult {
    pub result: SlideResult,
    pub state: GameState,
    /// True when no slide remains and the next advance ends the game.
    pub finished: bool,
}

pub struct SubmitSoloAnswersHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitSoloAnswersHandler {
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
        cmd: SubmitSoloAnswersCommand,
        metadata: &CommandMetadata,
    ) -> Result<SubmitSoloAnswersResult, GameError> {
        let handle = load_session(self.sessions.as_ref(), &cmd.pin).await?;
        let mut session = handle.lock().await;
        session.authorize_host(&cmd.host_id)?;
        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;

        let closing = current_slide(&session, quiz.as_ref())?;
        let result =
            SubmissionEvaluationService::evaluate_batch(&mut session, quiz.as_ref(), &cmd.submissions)?;

        let events = vec![
            question_results(&session, &closing, metadata),
            state_updated(&session, quiz.as_ref(), metadata),
        ];
        let state = session.state();
        let finished = session.progress().is_complete();
        drop(session);

        info!(
            pin = %cmd.pin,
            slide_id = %closing.id,
            answers = result.len(),
            finished,
            "Solo slide closed"
        );
        self.event_publisher.publish_all(events).await?;

        Ok(SubmitSoloAnswersResult {
            result,
            state,
            finished,
        })
    }
}
