//! Domain layer containing the game engine's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, events)
//! - `quiz` - Quiz content model and scoring strategies
//! - `game` - Session aggregate, players, answers, scoreboard
//! - `services` - Evaluation, progress/ranking and PIN generation

pub mod foundation;
pub mod game;
pub mod quiz;
pub mod services;
