//! Player submissions and their evaluated results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SlideId;
use crate::domain::game::GameError;

/// A player's raw answer to one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub slide_id: SlideId,
    /// Selected option indices; empty when the player ran out of time.
    pub selected: Vec<usize>,
    /// Milliseconds between the question opening and the answer.
    pub response_time_ms: u64,
}

impl Submission {
    pub fn new(slide_id: SlideId, selected: Vec<usize>, response_time_ms: u64) -> Self {
        Self {
            slide_id,
            selected,
            response_time_ms,
        }
    }

    /// Empty submission recorded for a player who never answered.
    pub fn timed_out(slide_id: SlideId, time_limit_secs: u32) -> Self {
        Self {
            slide_id,
            selected: Vec::new(),
            response_time_ms: u64::from(time_limit_secs) * 1000,
        }
    }

    /// Validates the selection against the number of options and returns it as a set.
    ///
    /// # Errors
    ///
    /// - `Validation` if an index is out of range or repeated
    pub fn selection(&self, option_count: usize) -> Result<BTreeSet<usize>, GameError> {
        let mut set = BTreeSet::new();
        for &index in &self.selected {
            if index >= option_count {
                return Err(GameError::validation(
                    "selected",
                    format!("option {} does not exist (slide has {})", index, option_count),
                ));
            }
            if !set.insert(index) {
                return Err(GameError::validation(
                    "selected",
                    format!("option {} selected twice", index),
                ));
            }
        }
        Ok(set)
    }

    pub fn is_timed_out(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Content of a selected option, echoed back for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerContent {
    Text(String),
    Image(String),
}

/// Outcome of evaluating a submission against the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub slide_id: SlideId,
    pub selected: Vec<usize>,
    pub is_correct: bool,
    pub score: u32,
    pub response_time_ms: u64,
    pub answer_content: Vec<AnswerContent>,
}
