//! Ranked scoreboard.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlayerId;

use super::Player;

/// One row of the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub player_id: PlayerId,
    pub nickname: String,
    pub score: u32,
    /// 1-based position.
    pub rank: u32,
    /// Rank in the previous computation; 1 before the first one.
    pub previous_rank: u32,
}

/// Players ordered by cumulative score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    entries: Vec<ScoreboardEntry>,
}

impl Scoreboard {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a freshly joined player at the bottom.
    pub(crate) fn seed(&mut self, player: &Player) {
        self.entries.push(ScoreboardEntry {
            player_id: player.id(),
            nickname: player.nickname().to_string(),
            score: player.score(),
            rank: self.entries.len() as u32 + 1,
            previous_rank: 1,
        });
    }

    /// Builds the next scoreboard from current player scores.
    ///
    /// Players with equal scores keep the order of `players`, so repeated
    /// recomputation over unchanged scores yields identical ranks.
    pub fn recompute(&self, players: &[Player]) -> Scoreboard {
        let mut ordered: Vec<&Player> = players.iter().collect();
        ordered.sort_by(|a, b| b.score().cmp(&a.score()));

        let entries = ordered
            .into_iter()
            .enumerate()
            .map(|(position, player)| ScoreboardEntry {
                player_id: player.id(),
                nickname: player.nickname().to_string(),
                score: player.score(),
                rank: position as u32 + 1,
                previous_rank: self
                    .entry_for(&player.id())
                    .map(|entry| entry.rank)
                    .unwrap_or(1),
            })
            .collect();

        Scoreboard { entries }
    }

    pub fn entries(&self) -> &[ScoreboardEntry] {
        &self.entries
    }

    pub fn entry_for(&self, player_id: &PlayerId) -> Option<&ScoreboardEntry> {
        self.entries.iter().find(|entry| &entry.player_id == player_id)
    }

    /// Top-ranked entry, if anyone played.
    pub fn winner(&self) -> Option<&ScoreboardEntry> {
        self.entries.iter().find(|entry| entry.rank == 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
