//! Public read model of a session, safe to send to every participant.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlayerId, SessionId, UserId};
use crate::domain::quiz::{PublicSlide, QuizContent};

use super::{GameSession, GameState, ScoreboardEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub nickname: String,
    pub score: u32,
}

/// Session state without any answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    pub session_id: SessionId,
    pub pin: String,
    pub host_id: UserId,
    pub state: GameState,
    pub players: Vec<PlayerView>,
    /// Only present while a question is open.
    pub current_slide: Option<PublicSlide>,
    pub scoreboard: Vec<ScoreboardEntry>,
    pub slides_answered: usize,
    pub total_slides: usize,
}

impl GameStateView {
    pub fn of(session: &GameSession, quiz: &dyn QuizContent) -> Self {
        let current_slide = if session.state() == GameState::Question {
            quiz.slide_snapshot_by_id(&session.current_slide_id())
                .map(|slide| slide.without_answer_key())
        } else {
            None
        };

        Self {
            session_id: session.id(),
            pin: session.pin().to_string(),
            host_id: session.host_id().clone(),
            state: session.state(),
            players: session
                .players()
                .iter()
                .map(|p| PlayerView {
                    player_id: p.id(),
                    nickname: p.nickname().to_string(),
                    score: p.score(),
                })
                .collect(),
            current_slide,
            scoreboard: session.ranking().entries().to_vec(),
            slides_answered: session.progress().slides_answered(),
            total_slides: session.progress().total_slides(),
        }
    }
}
