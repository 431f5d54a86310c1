//! Game engine configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::session_store::{SessionStoreConfig, SweeperConfig};

use super::error::ValidationError;

/// Limits and timers of the session engine
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// PIN draws before giving up with an exhaustion error
    #[serde(default = "default_pin_max_attempts")]
    pub pin_max_attempts: u32,

    /// How long a QR token resolves, in seconds
    #[serde(default = "default_qr_token_ttl")]
    pub qr_token_ttl_secs: u64,

    /// Idle time after which a session is evicted, in seconds
    #[serde(default = "default_inactivity_threshold")]
    pub inactivity_threshold_secs: u64,

    /// Period of the inactivity sweep, in seconds
    #[serde(default = "default_sweep_interval")]
    pub inactivity_sweep_interval_secs: u64,

    /// Period of the QR token sweep, in seconds
    #[serde(default = "default_sweep_interval")]
    pub qr_sweep_interval_secs: u64,

    /// Longest accepted nickname, in characters
    #[serde(default = "default_max_nickname_length")]
    pub max_nickname_length: usize,

    /// Directory of `*.json` quiz documents loaded at startup
    #[serde(default)]
    pub quiz_dir: Option<String>,
}

impl GameConfig {
    pub fn qr_token_ttl(&self) -> Duration {
        Duration::from_secs(self.qr_token_ttl_secs)
    }

    pub fn inactivity_threshold(&self) -> Duration {
        Duration::from_secs(self.inactivity_threshold_secs)
    }

    pub fn store_config(&self) -> SessionStoreConfig {
        SessionStoreConfig {
            qr_token_ttl: self.qr_token_ttl(),
            inactivity_threshold: self.inactivity_threshold(),
        }
    }

    pub fn sweeper_config(&self) -> SweeperConfig {
        SweeperConfig {
            inactivity_interval: Duration::from_secs(self.inactivity_sweep_interval_secs),
            qr_token_interval: Duration::from_secs(self.qr_sweep_interval_secs),
        }
    }

    /// Validate game configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pin_max_attempts == 0 {
            return Err(ValidationError::MustBePositive("pin_max_attempts"));
        }
        if self.qr_token_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive("qr_token_ttl_secs"));
        }
        if self.inactivity_threshold_secs == 0 {
            return Err(ValidationError::MustBePositive("inactivity_threshold_secs"));
        }
        if self.inactivity_sweep_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("inactivity_sweep_interval_secs"));
        }
        if self.qr_sweep_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("qr_sweep_interval_secs"));
        }
        if self.inactivity_sweep_interval_secs > self.inactivity_threshold_secs {
            return Err(ValidationError::SweepIntervalTooLong {
                interval: self.inactivity_sweep_interval_secs,
                lifetime: self.inactivity_threshold_secs,
            });
        }
        if self.max_nickname_length == 0 || self.max_nickname_length > 64 {
            return Err(ValidationError::InvalidNicknameLength(
                self.max_nickname_length,
            ));
        }
        if matches!(&self.quiz_dir, Some(dir) if dir.trim().is_empty()) {
            return Err(ValidationError::MissingRequired("LIVE_QUIZ__GAME__QUIZ_DIR"));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pin_max_attempts: default_pin_max_attempts(),
            qr_token_ttl_secs: default_qr_token_ttl(),
            inactivity_threshold_secs: default_inactivity_threshold(),
            inactivity_sweep_interval_secs: default_sweep_interval(),
            qr_sweep_interval_secs: default_sweep_interval(),
            max_nickname_length: default_max_nickname_length(),
            quiz_dir: None,
        }
    }
}

fn default_pin_max_attempts() -> u32 {
    crate::domain::services::DEFAULT_PIN_MAX_ATTEMPTS
}

fn default_qr_token_ttl() -> u64 {
    600
}

fn default_inactivity_threshold() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    600
}

fn default_max_nickname_length() -> usize {
    crate::domain::game::DEFAULT_MAX_NICKNAME_LENGTH
}
