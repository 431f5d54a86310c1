//! Active PIN store adapters.
//!
//! - `InMemoryPinStore` - Single process
//! - `RedisPinStore` - Shared across processes

mod in_memory;
mod redis;

pub use in_memory::InMemoryPinStore;
pub use self::redis::{RedisPinStore, DEFAULT_PIN_SET_KEY};
