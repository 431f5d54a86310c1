//! Live session registry and its background sweeper.

mod in_memory;
mod sweeper;

pub use in_memory::{InMemorySessionStore, SessionStoreConfig};
pub use sweeper::{SessionSweeper, SweeperConfig, SweeperHandle};
