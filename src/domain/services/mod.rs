//! Domain services coordinating the session aggregate with quiz content.
//!
//! - `SubmissionEvaluationService` - Scores submissions and records them
//! - `ProgressRankingService` - Closes slides and moves progress
//! - `PinGenerator` - Collision-checked, cryptographically random PINs

mod evaluation;
mod pin_generator;
mod ranking;

pub use evaluation::SubmissionEvaluationService;
pub use pin_generator::{PinGenerator, DEFAULT_PIN_MAX_ATTEMPTS};
pub use ranking::ProgressRankingService;
