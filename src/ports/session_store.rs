//! Session store port - the live registry of running games.
//!
//! Sessions are keyed by PIN. A secondary index maps short-lived QR tokens
//! to PINs for scan-to-join and reconnect.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::game::{GameSession, QrToken, SessionPin};

/// Shared handle to one live session.
///
/// Holding the lock serializes every operation on the session, including
/// eviction by the inactivity sweep.
pub type SessionHandle = Arc<Mutex<GameSession>>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session and mints its first QR token.
    ///
    /// # Errors
    ///
    /// - `ConsistencyViolation` if a session already holds the PIN
    async fn save(&self, session: GameSession) -> Result<QrToken, DomainError>;

    /// Looks up a session and records activity on it.
    async fn find_by_pin(&self, pin: &SessionPin) -> Result<Option<SessionHandle>, DomainError>;

    /// Resolves a QR token to its PIN. Expired tokens resolve to `None`.
    async fn find_by_qr_token(&self, token: &QrToken) -> Result<Option<SessionPin>, DomainError>;

    /// Mints another QR token for a live session.
    ///
    /// Returns `None` if no session holds the PIN.
    async fn issue_qr_token(&self, pin: &SessionPin) -> Result<Option<QrToken>, DomainError>;

    /// Records activity without handing out the session.
    async fn touch(&self, pin: &SessionPin) -> Result<(), DomainError>;

    /// Wall-clock time of the last recorded activity.
    async fn last_activity(&self, pin: &SessionPin) -> Result<Option<Timestamp>, DomainError>;

    /// Removes a session, its QR tokens and its PIN claim.
    ///
    /// Returns `false` if no session held the PIN.
    async fn delete(&self, pin: &SessionPin) -> Result<bool, DomainError>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize, DomainError>;
}
