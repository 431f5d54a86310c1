//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates the game domain through the ports. `GameCommandBus` is the
//! single entry point the gateway layer calls.

pub mod command_bus;
pub mod handlers;

pub use command_bus::{GameCommand, GameCommandBus, GameCommandOutput, GameServices};
pub use handlers::*;
