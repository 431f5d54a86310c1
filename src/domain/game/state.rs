//! Game phase state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Phase of a live game.
///
/// ```text
/// Lobby ──► Question ──► Results ──► End
///              ▲            │
///              └────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    /// Players are joining; no slide is open yet.
    Lobby,
    /// The current slide accepts answers.
    Question,
    /// Answers are closed and the scoreboard is shown.
    Results,
    /// All slides played.
    End,
}

impl GameState {
    /// Returns true while players may still join.
    pub fn accepts_players(&self) -> bool {
        matches!(self, GameState::Lobby)
    }

    /// Returns true while the current slide accepts answers.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, GameState::Question)
    }
}

impl StateMachine for GameState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use GameState::*;
        matches!(
            (self, target),
            (Lobby, Question) | (Question, Results) | (Results, Question) | (Results, End)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use GameState::*;
        match self {
            Lobby => vec![Question],
            Question => vec![Results],
            Results => vec![Question, End],
            End => vec![],
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameState::Lobby => "LOBBY",
            GameState::Question => "QUESTION",
            GameState::Results => "RESULTS",
            GameState::End => "END",
        };
        write!(f, "{}", s)
    }
}
