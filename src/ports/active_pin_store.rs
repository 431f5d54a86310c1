//! Active PIN store port.
//!
//! Process-wide registry of PINs held by live sessions. Generation checks
//! each candidate against the set, then claims it; the claim must be atomic so two
//! generators can never both win the same PIN.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::game::SessionPin;

#[async_trait]
pub trait ActivePinStore: Send + Sync {
    /// Snapshot of every PIN currently held.
    async fn get_active_pins(&self) -> Result<HashSet<SessionPin>, DomainError>;

    /// Whether a single PIN is currently held.
    ///
    /// Stores with a native membership query should override this.
    async fn is_pin_active(&self, pin: &SessionPin) -> Result<bool, DomainError> {
        Ok(self.get_active_pins().await?.contains(pin))
    }

    /// Claims a PIN.
    ///
    /// Returns `false` if the PIN was already held.
    async fn save_new_pin(&self, pin: &SessionPin) -> Result<bool, DomainError>;

    /// Releases a PIN. Releasing an unknown PIN is a no-op.
    async fn release_pin(&self, pin: &SessionPin) -> Result<(), DomainError>;
}
