//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the game engine and the outside world. Adapters implement these ports.
//!
//! ## Content
//!
//! - `QuizRepository` - Read access to quiz content
//!
//! ## Live State
//!
//! - `SessionStore` - Registry of running sessions, PIN and QR lookup
//! - `ActivePinStore` - Process-wide set of claimed PINs
//!
//! ## Output
//!
//! - `SessionArchiveRepository` - Write-once archive of finished games
//! - `EventPublisher` - Game events for the gateway layer

mod active_pin_store;
mod event_publisher;
mod quiz_repository;
mod session_archive_repository;
mod session_store;

pub use active_pin_store::ActivePinStore;
pub use event_publisher::EventPublisher;
pub use quiz_repository::QuizRepository;
pub use session_archive_repository::SessionArchiveRepository;
pub use session_store::{SessionHandle, SessionStore};
