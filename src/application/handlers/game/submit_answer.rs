//! SubmitAnswerHandler - A player answers the open question.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::{CommandMetadata, PlayerId};
use crate::domain::game::{GameError, SessionPin, SessionPlayerAnswer};
use crate::domain::quiz::Submission;
use crate::domain::services::SubmissionEvaluationService;
use crate::ports::{QuizRepository, SessionStore};

use super::support::{load_quiz, load_session};

#[derive(Debug, Clone)]
pub struct SubmitAnswerCommand {
    pub pin: SessionPin,
    pub player_id: PlayerId,
    pub submission: Submission,
}

#[derive(Debug, Clone)]
pub struct SubmitAnswerResult {
    pub answer: SessionPlayerAnswer,
    /// True once every player has answered the open slide.
    pub all_answered: bool,
}

pub struct SubmitAnswerHandler {
    quizzes: Arc<dyn QuizRepository>,
    sessions: Arc<dyn SessionStore>,
}

impl SubmitAnswerHandler {
    pub fn new(quizzes: Arc<dyn QuizRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { quizzes, sessions }
    }

    pub async fn handle(
        &self,
        cmd: SubmitAnswerCommand,
        _metadata: &CommandMetadata,
    ) -> Result<SubmitAnswerResult, GameError> {
        let handle = load_session(self.sessions.as_ref(), &cmd.pin).await?;
        let mut session = handle.lock().await;
        let quiz = load_quiz(self.quizzes.as_ref(), &session.kahoot_id()).await?;

        let answer = SubmissionEvaluationService::evaluate_one(
            &mut session,
            quiz.as_ref(),
            cmd.player_id,
            &cmd.submission,
        )
        .map_err(|err| {
            if !err.is_fatal() {
                warn!(pin = %cmd.pin, player_id = %cmd.player_id, error = %err, "Answer rejected");
            }
            err
        })?;
        let all_answered = session.players_without_answer().is_empty();

        debug!(
            pin = %cmd.pin,
            player_id = %cmd.player_id,
            slide_id = %answer.slide_id,
            correct = answer.is_correct,
            score = answer.score,
            "Answer recorded"
        );

        Ok(SubmitAnswerResult {
            answer,
            all_answered,
        })
    }
}
