//! Multiplayer session engine.
//!
//! # Components
//!
//! - `GameSession` - Aggregate holding one live game and its phase machine
//! - `Player`, `Nickname`, `PlayerIdentity` - Participants
//! - `SlideResult`, `SessionPlayerAnswer` - Immutable per-slide answers
//! - `Scoreboard` - Ranked players, recomputed after each slide
//! - `SessionFactory`, `PlayerFactory` - Valid initial construction
//! - `ArchivedSession` - Flattened snapshot written at game end

mod answer;
mod errors;
mod events;
mod factory;
mod pin;
mod player;
mod progress;
mod scoreboard;
mod session;
mod snapshot;
mod state;
mod view;

pub use answer::{QuestionSnapshot, SessionPlayerAnswer, SlideResult};
pub use errors::GameError;
pub use events::{GameEnded, GameSessionCreated, GameStateUpdated, QuestionResults, QuestionStarted};
pub use factory::{PlayerFactory, SessionFactory, SessionSeed};
pub use pin::{QrToken, SessionPin};
pub use player::{Nickname, Player, PlayerIdentity, DEFAULT_MAX_NICKNAME_LENGTH};
pub use progress::Progress;
pub use scoreboard::{Scoreboard, ScoreboardEntry};
pub use session::GameSession;
pub use snapshot::{
    ArchivedPlayer, ArchivedProgress, ArchivedSession, ArchivedSlideResult, ArchivedTimes,
};
pub use state::GameState;
pub use view::{GameStateView, PlayerView};
