//! Session archive port - durable record of finished games.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::game::ArchivedSession;

/// Write-once storage for ended sessions.
#[async_trait]
pub trait SessionArchiveRepository: Send + Sync {
    /// Stores a finished session.
    ///
    /// Returns `false` if this session was already archived; the stored
    /// record is left untouched.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn archive_session(&self, archive: &ArchivedSession) -> Result<bool, DomainError>;
}
