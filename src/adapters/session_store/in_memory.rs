//! In-memory session store.
//!
//! Owns every live session, keyed by PIN, plus a QR-token index. Activity
//! timestamps use tokio's clock so tests can drive expiry with a paused
//! runtime.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::game::{GameSession, QrToken, SessionPin};
use crate::ports::{ActivePinStore, SessionHandle, SessionStore};

/// Lifetimes applied by the store.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// How long a QR token resolves after it was minted.
    pub qr_token_ttl: Duration,

    /// Sessions idle for longer are evicted by the sweep.
    pub inactivity_threshold: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            qr_token_ttl: Duration::from_secs(600),
            inactivity_threshold: Duration::from_secs(3600),
        }
    }
}

struct StoredSession {
    handle: SessionHandle,
    last_activity: Instant,
    last_activity_at: Timestamp,
}

impl StoredSession {
    fn touch(&mut self) {
        self.last_activity = Instant::now();
        self.last_activity_at = Timestamp::now();
    }
}

struct TokenEntry {
    pin: SessionPin,
    minted_at: Instant,
}

#[derive(Default)]
struct StoreState {
    sessions: HashMap<SessionPin, StoredSession>,
    qr_tokens: HashMap<QrToken, TokenEntry>,
}

impl StoreState {
    fn mint_token(&mut self, pin: &SessionPin) -> QrToken {
        let token = QrToken::generate();
        self.qr_tokens.insert(
            token.clone(),
            TokenEntry {
                pin: pin.clone(),
                minted_at: Instant::now(),
            },
        );
        token
    }

    fn drop_tokens_for(&mut self, pin: &SessionPin) {
        self.qr_tokens.retain(|_, entry| &entry.pin != pin);
    }
}

/// Live registry of running sessions.
pub struct InMemorySessionStore {
    state: RwLock<StoreState>,
    pins: Arc<dyn ActivePinStore>,
    config: SessionStoreConfig,
}

impl InMemorySessionStore {
    pub fn new(pins: Arc<dyn ActivePinStore>) -> Self {
        Self::with_config(pins, SessionStoreConfig::default())
    }

    pub fn with_config(pins: Arc<dyn ActivePinStore>, config: SessionStoreConfig) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            pins,
            config,
        }
    }

    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }

    /// Evicts sessions idle past the inactivity threshold and releases
    /// their PINs. Sessions whose lock is held are in use and are skipped.
    ///
    /// Returns the evicted PINs.
    pub async fn sweep_inactive(&self) -> Vec<SessionPin> {
        let threshold = self.config.inactivity_threshold;
        let evicted: Vec<SessionPin> = {
            let mut state = self.state.write().await;
            let stale: Vec<SessionPin> = state
                .sessions
                .iter()
                .filter(|(_, stored)| stored.last_activity.elapsed() > threshold)
                .filter(|(_, stored)| stored.handle.try_lock().is_ok())
                .map(|(pin, _)| pin.clone())
                .collect();

            for pin in &stale {
                state.sessions.remove(pin);
                state.drop_tokens_for(pin);
            }
            stale
        };

        for pin in &evicted {
            tracing::info!(pin = %pin, "Evicted inactive session");
            self.release_pin(pin).await;
        }
        evicted
    }

    /// Drops QR tokens past their TTL. Returns how many were removed.
    pub async fn sweep_expired_tokens(&self) -> usize {
        let ttl = self.config.qr_token_ttl;
        let mut state = self.state.write().await;
        let before = state.qr_tokens.len();
        state
            .qr_tokens
            .retain(|_, entry| entry.minted_at.elapsed() < ttl);
        let removed = before - state.qr_tokens.len();
        if removed > 0 {
            tracing::debug!(removed, "Purged expired QR tokens");
        }
        removed
    }

    /// Number of QR tokens currently indexed, expired or not.
    pub async fn token_count(&self) -> usize {
        self.state.read().await.qr_tokens.len()
    }

    async fn release_pin(&self, pin: &SessionPin) {
        if let Err(e) = self.pins.release_pin(pin).await {
            tracing::warn!(pin = %pin, error = %e, "Failed to release session PIN");
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: GameSession) -> Result<QrToken, DomainError> {
        let pin = session.pin().clone();
        let mut state = self.state.write().await;
        if state.sessions.contains_key(&pin) {
            return Err(DomainError::new(
                ErrorCode::ConsistencyViolation,
                format!("A live session already holds PIN {}", pin),
            ));
        }

        state.sessions.insert(
            pin.clone(),
            StoredSession {
                handle: Arc::new(Mutex::new(session)),
                last_activity: Instant::now(),
                last_activity_at: Timestamp::now(),
            },
        );
        Ok(state.mint_token(&pin))
    }

    async fn find_by_pin(&self, pin: &SessionPin) -> Result<Option<SessionHandle>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.sessions.get_mut(pin).map(|stored| {
            stored.touch();
            Arc::clone(&stored.handle)
        }))
    }

    async fn find_by_qr_token(&self, token: &QrToken) -> Result<Option<SessionPin>, DomainError> {
        let ttl = self.config.qr_token_ttl;
        let mut state = self.state.write().await;

        let pin = match state.qr_tokens.get(token) {
            None => return Ok(None),
            Some(entry) if entry.minted_at.elapsed() >= ttl => None,
            Some(entry) => Some(entry.pin.clone()),
        };

        match pin {
            Some(pin) if state.sessions.contains_key(&pin) => {
                if let Some(stored) = state.sessions.get_mut(&pin) {
                    stored.touch();
                }
                Ok(Some(pin))
            }
            _ => {
                // Expired, or the session is gone.
                state.qr_tokens.remove(token);
                Ok(None)
            }
        }
    }

    async fn issue_qr_token(&self, pin: &SessionPin) -> Result<Option<QrToken>, DomainError> {
        let mut state = self.state.write().await;
        if !state.sessions.contains_key(pin) {
            return Ok(None);
        }
        Ok(Some(state.mint_token(pin)))
    }

    async fn touch(&self, pin: &SessionPin) -> Result<(), DomainError> {
        if let Some(stored) = self.state.write().await.sessions.get_mut(pin) {
            stored.touch();
        }
        Ok(())
    }

    async fn last_activity(&self, pin: &SessionPin) -> Result<Option<Timestamp>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .sessions
            .get(pin)
            .map(|stored| stored.last_activity_at))
    }

    async fn delete(&self, pin: &SessionPin) -> Result<bool, DomainError> {
        let removed = {
            let mut state = self.state.write().await;
            let removed = state.sessions.remove(pin).is_some();
            state.drop_tokens_for(pin);
            removed
        };
        if removed {
            self.release_pin(pin).await;
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.state.read().await.sessions.len())
    }
}
