//! Session archive adapters.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryArchiveRepository;
pub use postgres::PostgresArchiveRepository;
