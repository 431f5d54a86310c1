//! Redis-backed active PIN store.
//!
//! Claimed PINs live in one Redis set. `SADD` reports whether the member
//! was new, which makes the claim atomic across processes. Candidates are
//! checked with `SISMEMBER` so generation never copies the whole set.

use std::collections::HashSet;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::game::SessionPin;
use crate::ports::ActivePinStore;

/// Default key of the PIN set.
pub const DEFAULT_PIN_SET_KEY: &str = "live_quiz:active_pins";

#[derive(Clone)]
pub struct RedisPinStore {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisPinStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            key: DEFAULT_PIN_SET_KEY.to_string(),
        }
    }

    /// Use a different set key (e.g. per environment).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

fn cache_error(action: &str, e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl ActivePinStore for RedisPinStore {
    async fn get_active_pins(&self) -> Result<HashSet<SessionPin>, DomainError> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .smembers(&self.key)
            .await
            .map_err(|e| cache_error("read active PINs", e))?;

        // Malformed members are skipped; they can never match a generated PIN.
        Ok(members
            .into_iter()
            .filter_map(|member| match SessionPin::new(member) {
                Ok(pin) => Some(pin),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed PIN in active set");
                    None
                }
            })
            .collect())
    }

    async fn is_pin_active(&self, pin: &SessionPin) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        conn.sismember(&self.key, pin.as_str())
            .await
            .map_err(|e| cache_error("check PIN", e))
    }

    async fn save_new_pin(&self, pin: &SessionPin) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let added: i64 = conn
            .sadd(&self.key, pin.as_str())
            .await
            .map_err(|e| cache_error("claim PIN", e))?;
        Ok(added == 1)
    }

    async fn release_pin(&self, pin: &SessionPin) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(&self.key, pin.as_str())
            .await
            .map_err(|e| cache_error("release PIN", e))?;
        Ok(())
    }
}
