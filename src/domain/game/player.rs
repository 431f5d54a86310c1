//! Players taking part in a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{GuestId, PlayerId, UserId, ValidationError};

/// Default upper bound on nickname length, in characters.
pub const DEFAULT_MAX_NICKNAME_LENGTH: usize = 20;

/// Punctuation allowed in nicknames besides letters and digits.
const NICKNAME_PUNCTUATION: &[char] = &[' ', '-', '_', '.', '!', '?'];

/// Display name chosen by a player.
///
/// # Invariants
///
/// - non-empty after trimming
/// - at most the configured number of characters
/// - letters, digits, spaces and `-_.!?` only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    /// Trims and validates a nickname.
    pub fn new(raw: &str, max_length: usize) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("nickname"));
        }

        let length = trimmed.chars().count();
        if length > max_length {
            return Err(ValidationError::out_of_range(
                "nickname",
                1,
                max_length as i64,
                length as i64,
            ));
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !c.is_alphanumeric() && !NICKNAME_PUNCTUATION.contains(c))
        {
            return Err(ValidationError::invalid_format(
                "nickname",
                format!("character '{}' is not allowed", bad.escape_default()),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used for uniqueness checks within a session.
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is behind a player: a registered account or an anonymous guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PlayerIdentity {
    Registered(UserId),
    Guest(GuestId),
}

impl PlayerIdentity {
    pub fn is_guest(&self) -> bool {
        matches!(self, PlayerIdentity::Guest(_))
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerIdentity::Registered(id) => write!(f, "user:{}", id),
            PlayerIdentity::Guest(id) => write!(f, "guest:{}", id),
        }
    }
}

/// A participant in one session.
///
/// Players are entities: two players are equal when their ids match,
/// whatever their nickname or score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    identity: PlayerIdentity,
    nickname: Nickname,
    score: u32,
}

impl Player {
    pub(crate) fn new(id: PlayerId, identity: PlayerIdentity, nickname: Nickname) -> Self {
        Self {
            id,
            identity,
            nickname,
            score: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Cumulative score across all closed slides.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_is_trimmed() {
        let nickname = Nickname::new("  Ada  ", 20).unwrap();
        assert_eq!(nickname.as_str(), "Ada");
    }

    #[test]
    fn blank_nickname_is_rejected() {
        assert!(matches!(
            Nickname::new("   ", 20),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn long_nickname_is_rejected() {
        assert!(matches!(
            Nickname::new("abcdefghijk", 10),
            Err(ValidationError::OutOfRange { actual: 11, .. })
        ));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(Nickname::new("Zoë Müller", 10).is_ok());
    }

    #[test]
    fn markup_characters_are_rejected() {
        assert!(Nickname::new("<script>", 20).is_err());
        assert!(Nickname::new("tab\there", 20).is_err());
    }

    #[test]
    fn players_compare_by_id() {
        let id = PlayerId::new();
        let guest = PlayerIdentity::Guest(GuestId::new());
        let mut a = Player::new(id, guest.clone(), Nickname::new("A", 20).unwrap());
        let b = Player::new(id, guest, Nickname::new("B", 20).unwrap());
        a.add_score(100);
        assert_eq!(a, b);
    }

    #[test]
    fn score_saturates() {
        let mut player = Player::new(
            PlayerId::new(),
            PlayerIdentity::Guest(GuestId::new()),
            Nickname::new("Max", 20).unwrap(),
        );
        player.add_score(u32::MAX);
        player.add_score(10);
        assert_eq!(player.score(), u32::MAX);
    }
}
