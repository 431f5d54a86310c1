//! Live Quiz - Multiplayer quiz session engine
//!
//! Hosts open a lobby for one of their quizzes, players join by PIN or QR
//! token, and the host paces the game through timed questions. Answers are
//! scored by speed, the scoreboard is re-ranked after every slide and the
//! finished game is archived once.
//!
//! - `domain` - quiz content, the `GameSession` aggregate and its services
//! - `ports` - interfaces to quiz content, PIN registry, archive, session store
//! - `adapters` - in-memory, PostgreSQL and Redis implementations
//! - `application` - command/query handlers behind `GameCommandBus`
//! - `config` - environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
