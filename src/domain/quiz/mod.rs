//! Quiz content model.
//!
//! Slides, submissions and scoring rules as seen by the session engine.

mod quiz;
mod scoring;
mod slide;
mod submission;

pub use quiz::{Quiz, QuizContent};
pub use scoring::{
    strategy_for, NonScoring, ScoreOutcome, ScoringInput, ScoringStrategy, TimeWeightedScoring,
};
pub use slide::{AnswerOption, PublicOption, PublicSlide, SlideKind, SlideSnapshot};
pub use submission::{AnswerContent, EvaluationResult, Submission};
