//! Redis configuration for the shared PIN registry

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Set holding every active PIN
    #[serde(default = "default_pin_set_key")]
    pub pin_set_key: String,
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("LIVE_QUIZ__REDIS__URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.pin_set_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("LIVE_QUIZ__REDIS__PIN_SET_KEY"));
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: default_timeout(),
            pin_set_key: default_pin_set_key(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_pin_set_key() -> String {
    crate::adapters::pins::DEFAULT_PIN_SET_KEY.to_string()
}
