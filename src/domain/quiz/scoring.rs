//! Scoring strategies.
//!
//! A correct answer earns `round((1 - (t / limit) / 2) * base_points)`:
//! full points at t = 0, half at t = limit. Correctness is an exact match
//! between the selected set and the set of correct options.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::domain::game::GameError;

use super::SlideKind;

/// Everything a strategy needs to score one submission.
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    pub selected: &'a BTreeSet<usize>,
    pub correct: &'a BTreeSet<usize>,
    pub response_time: Duration,
    pub time_limit_secs: u32,
    pub base_points: u32,
}

/// Correctness and points for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub is_correct: bool,
    pub score: u32,
}

impl ScoreOutcome {
    pub const INCORRECT: Self = Self {
        is_correct: false,
        score: 0,
    };
}

/// Computes score and correctness for a submission.
pub trait ScoringStrategy: Send + Sync {
    /// # Errors
    ///
    /// - `Consistency` if the slide cannot be scored
    fn score(&self, input: &ScoringInput<'_>) -> Result<ScoreOutcome, GameError>;
}

/// Time-decayed scoring with exact-set correctness.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeWeightedScoring;

impl TimeWeightedScoring {
    fn points(response_time: Duration, time_limit_secs: u32, base_points: u32) -> u32 {
        if time_limit_secs == 0 {
            return base_points;
        }

        let limit = f64::from(time_limit_secs);
        let elapsed = response_time.as_secs_f64();
        // Answers arriving after the limit are late.
        if elapsed > limit {
            return 0;
        }

        let factor = (1.0 - (elapsed / limit) / 2.0).max(0.0);
        (factor * f64::from(base_points)).round() as u32
    }
}

impl ScoringStrategy for TimeWeightedScoring {
    fn score(&self, input: &ScoringInput<'_>) -> Result<ScoreOutcome, GameError> {
        if input.correct.is_empty() {
            return Err(GameError::consistency(
                "slide has no correct option defined",
            ));
        }

        // An empty selection is a timed-out answer and never correct.
        if input.selected.is_empty() || input.selected != input.correct {
            return Ok(ScoreOutcome::INCORRECT);
        }

        Ok(ScoreOutcome {
            is_correct: true,
            score: Self::points(input.response_time, input.time_limit_secs, input.base_points),
        })
    }
}

/// Strategy for display-only slides; invoking it is always an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonScoring;

impl ScoringStrategy for NonScoring {
    fn score(&self, _input: &ScoringInput<'_>) -> Result<ScoreOutcome, GameError> {
        Err(GameError::consistency(
            "display-only slides are never evaluated",
        ))
    }
}

static TIME_WEIGHTED: TimeWeightedScoring = TimeWeightedScoring;
static NON_SCORING: NonScoring = NonScoring;

/// Picks the strategy for a slide kind.
pub fn strategy_for(kind: SlideKind) -> &'static dyn ScoringStrategy {
    if kind.is_scored() {
        &TIME_WEIGHTED
    } else {
        &NON_SCORING
    }
}
