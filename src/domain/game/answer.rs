//! Evaluated player answers and per-slide results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlayerId, SlideId};
use crate::domain::quiz::{AnswerContent, EvaluationResult, SlideSnapshot};

use super::GameError;

/// Question as displayed when the answer was given.
///
/// Kept with every answer so archived games stay readable after the quiz
/// content changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSnapshot {
    pub text: String,
    pub base_points: u32,
    pub time_limit_secs: u32,
}

impl From<&SlideSnapshot> for QuestionSnapshot {
    fn from(slide: &SlideSnapshot) -> Self {
        Self {
            text: slide.question.clone(),
            base_points: slide.base_points,
            time_limit_secs: slide.time_limit_secs,
        }
    }
}

/// One player's evaluated answer to one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlayerAnswer {
    pub player_id: PlayerId,
    pub slide_id: SlideId,
    pub selected: Vec<usize>,
    pub is_correct: bool,
    pub score: u32,
    pub response_time_ms: u64,
    pub answer_content: Vec<AnswerContent>,
    pub question: QuestionSnapshot,
}

impl SessionPlayerAnswer {
    pub fn from_evaluation(
        player_id: PlayerId,
        evaluation: EvaluationResult,
        slide: &SlideSnapshot,
    ) -> Self {
        Self {
            player_id,
            slide_id: evaluation.slide_id,
            selected: evaluation.selected,
            is_correct: evaluation.is_correct,
            score: evaluation.score,
            response_time_ms: evaluation.response_time_ms,
            answer_content: evaluation.answer_content,
            question: QuestionSnapshot::from(slide),
        }
    }
}

/// All answers collected for one slide.
///
/// Immutable: adding an answer yields a new result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideResult {
    slide_id: SlideId,
    answers: BTreeMap<PlayerId, SessionPlayerAnswer>,
}

impl SlideResult {
    /// Result with no answers yet.
    pub fn empty(slide_id: SlideId) -> Self {
        Self {
            slide_id,
            answers: BTreeMap::new(),
        }
    }

    /// Builds a result from a batch of answers.
    ///
    /// # Errors
    ///
    /// - `Consistency` if an answer addresses another slide
    /// - `DuplicateAnswer` if a player appears twice
    pub fn from_answers(
        slide_id: SlideId,
        answers: impl IntoIterator<Item = SessionPlayerAnswer>,
    ) -> Result<Self, GameError> {
        answers
            .into_iter()
            .try_fold(Self::empty(slide_id), |result, answer| result.with_answer(answer))
    }

    /// Returns a copy of this result with one more answer.
    ///
    /// # Errors
    ///
    /// - `Consistency` if the answer addresses another slide
    /// - `DuplicateAnswer` if the player already answered
    pub fn with_answer(&self, answer: SessionPlayerAnswer) -> Result<Self, GameError> {
        if answer.slide_id != self.slide_id {
            return Err(GameError::consistency(format!(
                "answer for slide {} cannot join result of slide {}",
                answer.slide_id, self.slide_id
            )));
        }
        if self.answers.contains_key(&answer.player_id) {
            return Err(GameError::DuplicateAnswer {
                player_id: answer.player_id,
                slide_id: self.slide_id,
            });
        }

        let mut answers = self.answers.clone();
        answers.insert(answer.player_id, answer);
        Ok(Self {
            slide_id: self.slide_id,
            answers,
        })
    }

    pub fn slide_id(&self) -> SlideId {
        self.slide_id
    }

    pub fn answer_for(&self, player_id: &PlayerId) -> Option<&SessionPlayerAnswer> {
        self.answers.get(player_id)
    }

    pub fn has_answered(&self, player_id: &PlayerId) -> bool {
        self.answers.contains_key(player_id)
    }

    pub fn answers(&self) -> impl Iterator<Item = &SessionPlayerAnswer> {
        self.answers.values()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.answers.keys()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}
