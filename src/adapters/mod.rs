//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the game engine to external systems:
//! - `events` - Event bus (in-memory broadcast)
//! - `quiz` - Quiz content (in-memory)
//! - `pins` - Active PIN set (in-memory, Redis)
//! - `archive` - Finished-game archive (in-memory, PostgreSQL)
//! - `session_store` - Live session registry and sweeper

pub mod archive;
pub mod events;
pub mod pins;
pub mod quiz;
pub mod session_store;

pub use archive::{InMemoryArchiveRepository, PostgresArchiveRepository};
pub use events::InMemoryEventBus;
pub use pins::{InMemoryPinStore, RedisPinStore};
pub use quiz::InMemoryQuizRepository;
pub use session_store::{
    InMemorySessionStore, SessionStoreConfig, SessionSweeper, SweeperConfig, SweeperHandle,
};
