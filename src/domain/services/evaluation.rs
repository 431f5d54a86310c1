//! Submission evaluation.
//!
//! Bridges quiz-content scoring with session mutation: a submission is
//! scored by the quiz, frozen into a [`SessionPlayerAnswer`] and appended to
//! the current slide's result.

use crate::domain::foundation::PlayerId;
use crate::domain::game::{GameError, GameSession, GameState, SessionPlayerAnswer, SlideResult};
use crate::domain::quiz::{QuizContent, SlideSnapshot, Submission};

use super::ProgressRankingService;

/// Evaluates submissions against quiz content and records them.
pub struct SubmissionEvaluationService;

impl SubmissionEvaluationService {
    /// Scores one submission and appends it to the session.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if no question is open or the slide takes no answers
    /// - `Consistency` if the submission addresses a slide other than the current one
    /// - `NotFound` if the player or slide is unknown
    /// - `Validation` for a malformed selection
    /// - `DuplicateAnswer` if the player already answered
    pub fn evaluate_one(
        session: &mut GameSession,
        quiz: &dyn QuizContent,
        player_id: PlayerId,
        submission: &Submission,
    ) -> Result<SessionPlayerAnswer, GameError> {
        let answer = Self::evaluate(session, quiz, player_id, submission)?;
        session.add_player_answer(answer.slide_id, answer.clone())?;
        Ok(answer)
    }

    /// Scores every submission for the current slide, then closes it.
    ///
    /// All submissions are evaluated before any is recorded, so a malformed
    /// one leaves the session untouched. Returns the closed slide's result.
    pub fn evaluate_batch(
        session: &mut GameSession,
        quiz: &dyn QuizContent,
        submissions: &[(PlayerId, Submission)],
    ) -> Result<SlideResult, GameError> {
        let slide_id = session.current_slide_id();
        let current: &GameSession = session;
        let answers = submissions
            .iter()
            .map(|(player_id, submission)| Self::evaluate(current, quiz, *player_id, submission))
            .collect::<Result<Vec<_>, _>>()?;

        // Rejects duplicates inside the batch before touching the session.
        let batch = SlideResult::from_answers(slide_id, answers)?;
        for answer in batch.answers() {
            session.add_player_answer(slide_id, answer.clone())?;
        }

        Self::record_timeouts(session, quiz)?;
        ProgressRankingService::close_current_slide(session, quiz)?;

        session
            .slide_result(&slide_id)
            .cloned()
            .ok_or_else(|| GameError::consistency(format!("slide {} closed without a result", slide_id)))
    }

    /// Records a timed-out answer for every player who has not answered the
    /// open slide. Display slides are skipped. Returns how many were added.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if no question is open
    /// - `NotFound` if the current slide is not part of the quiz
    pub fn record_timeouts(
        session: &mut GameSession,
        quiz: &dyn QuizContent,
    ) -> Result<usize, GameError> {
        Self::ensure_open(session)?;
        let slide = Self::current_slide(session, quiz)?;
        if !slide.kind.is_scored() {
            return Ok(0);
        }

        let pending = session.players_without_answer();
        for player_id in &pending {
            let submission = Submission::timed_out(slide.id, slide.time_limit_secs);
            let evaluation = quiz.evaluate_answer(&submission)?;
            let answer = SessionPlayerAnswer::from_evaluation(*player_id, evaluation, &slide);
            session.add_player_answer(slide.id, answer)?;
        }
        Ok(pending.len())
    }

    fn evaluate(
        session: &GameSession,
        quiz: &dyn QuizContent,
        player_id: PlayerId,
        submission: &Submission,
    ) -> Result<SessionPlayerAnswer, GameError> {
        Self::ensure_open(session)?;

        if submission.slide_id != session.current_slide_id() {
            return Err(GameError::consistency(format!(
                "submission for slide {} but slide {} is open",
                submission.slide_id,
                session.current_slide_id()
            )));
        }
        session.require_player(&player_id)?;

        let slide = Self::current_slide(session, quiz)?;
        if !slide.kind.is_scored() {
            return Err(GameError::invalid_state(format!(
                "slide {} does not take answers",
                slide.id
            )));
        }

        let evaluation = quiz.evaluate_answer(submission)?;
        if evaluation.slide_id != submission.slide_id {
            return Err(GameError::consistency(format!(
                "quiz evaluated slide {} for a submission to slide {}",
                evaluation.slide_id, submission.slide_id
            )));
        }

        Ok(SessionPlayerAnswer::from_evaluation(player_id, evaluation, &slide))
    }

    fn ensure_open(session: &GameSession) -> Result<(), GameError> {
        if session.state() == GameState::Question {
            Ok(())
        } else {
            Err(GameError::invalid_state(format!(
                "session {} is in {}, answers are closed",
                session.pin(),
                session.state()
            )))
        }
    }

    fn current_slide(
        session: &GameSession,
        quiz: &dyn QuizContent,
    ) -> Result<SlideSnapshot, GameError> {
        let slide_id = session.current_slide_id();
        quiz.slide_snapshot_by_id(&slide_id)
            .ok_or_else(|| GameError::not_found("Slide", slide_id))
    }
}
