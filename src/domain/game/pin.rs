//! Session PINs and QR reconnect tokens.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Numeric room code players type to join a game.
///
/// Always 6 to 10 ASCII digits. A leading zero never occurs for generated
/// PINs but is accepted when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionPin(String);

impl SessionPin {
    pub const MIN_LENGTH: usize = 6;
    pub const MAX_LENGTH: usize = 10;

    /// Parses and validates a PIN.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if blank
    /// - `OutOfRange` if not 6 to 10 characters long
    /// - `InvalidFormat` if it contains anything other than digits
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::empty_field("pin"));
        }
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&value.len()) {
            return Err(ValidationError::out_of_range(
                "pin",
                Self::MIN_LENGTH as i64,
                Self::MAX_LENGTH as i64,
                value.len() as i64,
            ));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("pin", "must contain only digits"));
        }
        Ok(Self(value))
    }

    /// Builds a PIN from a number; fails if it does not have 6 to 10 digits.
    pub fn from_number(value: u64) -> Result<Self, ValidationError> {
        Self::new(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionPin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SessionPin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionPin> for String {
    fn from(pin: SessionPin) -> Self {
        pin.0
    }
}

/// Opaque short-lived token resolving to a session PIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QrToken(String);

impl QrToken {
    const BYTES: usize = 16;

    /// Mints a fresh 128-bit token from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Wraps a token received from a client.
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QrToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
