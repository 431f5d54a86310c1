//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process broadcast bus with bounded history

mod in_memory;

pub use in_memory::{InMemoryEventBus, DEFAULT_HISTORY_LIMIT};
