//! In-memory active PIN store for single-process deployments and tests.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::game::SessionPin;
use crate::ports::ActivePinStore;

/// Set of claimed PINs guarded by an async lock.
///
/// `save_new_pin` is a single insert under the write lock, so concurrent
/// claims of the same PIN have exactly one winner.
#[derive(Default)]
pub struct InMemoryPinStore {
    pins: RwLock<HashSet<SessionPin>>,
}

impl InMemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, pin: &SessionPin) -> bool {
        self.pins.read().await.contains(pin)
    }

    pub async fn len(&self) -> usize {
        self.pins.read().await.len()
    }
}

#[async_trait]
impl ActivePinStore for InMemoryPinStore {
    async fn get_active_pins(&self) -> Result<HashSet<SessionPin>, DomainError> {
        Ok(self.pins.read().await.clone())
    }

    async fn is_pin_active(&self, pin: &SessionPin) -> Result<bool, DomainError> {
        Ok(self.contains(pin).await)
    }

    async fn save_new_pin(&self, pin: &SessionPin) -> Result<bool, DomainError> {
        Ok(self.pins.write().await.insert(pin.clone()))
    }

    async fn release_pin(&self, pin: &SessionPin) -> Result<(), DomainError> {
        self.pins.write().await.remove(pin);
        Ok(())
    }
}
