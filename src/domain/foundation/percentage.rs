//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Share of `part` in `total`, rounded down. An empty total is zero percent.
    pub fn of(part: u32, total: u32) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let ratio = (u64::from(part.min(total)) * 100) / u64::from(total);
        Self(ratio as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_to_100() {
        assert_eq!(Percentage::new(150).value(), 100);
    }

    #[test]
    fn of_computes_share() {
        assert_eq!(Percentage::of(1, 4).value(), 25);
        assert_eq!(Percentage::of(3, 3), Percentage::HUNDRED);
        assert_eq!(Percentage::of(2, 3).value(), 66);
    }

    #[test]
    fn of_empty_total_is_zero() {
        assert_eq!(Percentage::of(0, 0), Percentage::ZERO);
    }

    #[test]
    fn displays_with_percent_sign() {
        assert_eq!(Percentage::new(42).to_string(), "42%");
    }
}
