//! Factories producing valid initial sessions and players.

use crate::domain::foundation::{GuestId, KahootId, PlayerId, SessionId, SlideId, UserId};
use crate::domain::quiz::QuizContent;

use super::player::DEFAULT_MAX_NICKNAME_LENGTH;
use super::{GameError, GameSession, Nickname, Player, PlayerIdentity, Progress, SessionPin};

/// What a session needs to know about its quiz up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSeed {
    pub kahoot_id: KahootId,
    pub first_slide_id: SlideId,
    pub total_slides: usize,
}

impl SessionSeed {
    /// # Errors
    ///
    /// - `Validation` if the quiz has no slides
    pub fn from_quiz(quiz: &dyn QuizContent) -> Result<Self, GameError> {
        let first = quiz
            .slide_snapshot_by_index(0)
            .ok_or_else(|| GameError::validation("slides", "quiz has no slides"))?;
        Ok(Self {
            kahoot_id: quiz.id(),
            first_slide_id: first.id,
            total_slides: quiz.slide_count(),
        })
    }
}

/// Builds sessions in the lobby.
pub struct SessionFactory;

impl SessionFactory {
    /// Creates a lobby session with a fresh id, empty scoreboard and no
    /// players.
    ///
    /// # Errors
    ///
    /// - `Validation` if the seed has no slides
    pub fn create(
        seed: SessionSeed,
        host_id: UserId,
        pin: SessionPin,
    ) -> Result<GameSession, GameError> {
        let progress = Progress::new(seed.first_slide_id, seed.total_slides)?;
        Ok(GameSession::new(
            SessionId::new(),
            host_id,
            seed.kahoot_id,
            pin,
            progress,
        ))
    }

    /// Creates a session for `quiz`, allowed only for the quiz author.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `host_id` did not author the quiz
    /// - `Validation` if the quiz has no slides
    pub fn create_for_quiz(
        quiz: &dyn QuizContent,
        host_id: UserId,
        pin: SessionPin,
    ) -> Result<GameSession, GameError> {
        if quiz.author_id() != &host_id {
            return Err(GameError::unauthorized(format!(
                "user {} cannot host quiz {}",
                host_id,
                quiz.id()
            )));
        }
        Self::create(SessionSeed::from_quiz(quiz)?, host_id, pin)
    }
}

/// Builds players with validated nicknames.
#[derive(Debug, Clone, Copy)]
pub struct PlayerFactory {
    max_nickname_length: usize,
}

impl PlayerFactory {
    pub fn new(max_nickname_length: usize) -> Self {
        Self {
            max_nickname_length,
        }
    }

    /// Player backed by a registered account.
    pub fn for_registered(&self, user_id: UserId, nickname: &str) -> Result<Player, GameError> {
        self.build(PlayerIdentity::Registered(user_id), nickname)
    }

    /// Anonymous player.
    pub fn for_guest(&self, guest_id: GuestId, nickname: &str) -> Result<Player, GameError> {
        self.build(PlayerIdentity::Guest(guest_id), nickname)
    }

    fn build(&self, identity: PlayerIdentity, nickname: &str) -> Result<Player, GameError> {
        let nickname = Nickname::new(nickname, self.max_nickname_length)?;
        Ok(Player::new(PlayerId::new(), identity, nickname))
    }
}

impl Default for PlayerFactory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NICKNAME_LENGTH)
    }
}
