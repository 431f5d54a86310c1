//! Flattened session snapshot written once when a game ends.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{KahootId, PlayerId, SessionId, SlideId, Timestamp, UserId};

use super::{GameSession, GameState, PlayerIdentity, ScoreboardEntry, SessionPlayerAnswer};

/// Durable record of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedSession {
    pub session_id: SessionId,
    pub host_id: UserId,
    pub kahoot_id: KahootId,
    pub pin: String,
    pub state: GameState,
    pub times: ArchivedTimes,
    pub progress: ArchivedProgress,
    pub ranking: Vec<ScoreboardEntry>,
    pub players: Vec<ArchivedPlayer>,
    pub slide_results: Vec<ArchivedSlideResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedTimes {
    pub started_at: Timestamp,
    pub last_activity: Timestamp,
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedProgress {
    pub current_slide_id: SlideId,
    pub total_slides: usize,
    pub slides_answered: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedPlayer {
    pub player_id: PlayerId,
    pub identity: PlayerIdentity,
    pub nickname: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedSlideResult {
    pub slide_id: SlideId,
    pub submissions: Vec<SessionPlayerAnswer>,
}

impl ArchivedSession {
    pub(crate) fn from_session(session: &GameSession, last_activity: Timestamp) -> Self {
        let progress = session.progress();
        Self {
            session_id: session.id(),
            host_id: session.host_id().clone(),
            kahoot_id: session.kahoot_id(),
            pin: session.pin().to_string(),
            state: session.state(),
            times: ArchivedTimes {
                started_at: session.started_at(),
                last_activity,
                completed_at: session.completed_at(),
            },
            progress: ArchivedProgress {
                current_slide_id: progress.current_slide_id(),
                total_slides: progress.total_slides(),
                slides_answered: progress.slides_answered(),
                percentage: progress.percentage().value(),
            },
            ranking: session.ranking().entries().to_vec(),
            players: session
                .players()
                .iter()
                .map(|player| ArchivedPlayer {
                    player_id: player.id(),
                    identity: player.identity().clone(),
                    nickname: player.nickname().to_string(),
                    score: player.score(),
                })
                .collect(),
            slide_results: session
                .closed_results()
                .map(|result| ArchivedSlideResult {
                    slide_id: result.slide_id(),
                    submissions: result.answers().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Total number of recorded submissions across all slides.
    pub fn submission_count(&self) -> usize {
        self.slide_results.iter().map(|r| r.submissions.len()).sum()
    }
}
