//! Game events published for the gateway layer.
//!
//! - `GameSessionCreated` - Session created in the lobby
//! - `GameStateUpdated` - Phase or roster changed
//! - `QuestionStarted` - A slide opened for answers
//! - `QuestionResults` - A slide closed
//! - `GameEnded` - Final scoreboard

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, SlideId, Timestamp, UserId};
use crate::domain::quiz::PublicSlide;

use super::{GameStateView, ScoreboardEntry};

// ════════════════════════════════════════════════════════════════════════════
// GameSessionCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a host creates a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSessionCreated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub pin: String,
    pub host_id: UserId,
    /// QR token the host shares for scan-to-join.
    pub reconnect_token: String,
    pub created_at: Timestamp,
}

domain_event!(
    GameSessionCreated,
    event_type = "game.session_created.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// GameStateUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published after any change participants should see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateUpdated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub view: GameStateView,
    pub updated_at: Timestamp,
}

domain_event!(
    GameStateUpdated,
    event_type = "game.state_updated.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = updated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// QuestionStarted
// ════════════════════════════════════════════════════════════════════════════

/// Published when a slide opens. Carries no correctness flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionStarted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub pin: String,
    pub slide: PublicSlide,
    pub started_at: Timestamp,
}

domain_event!(
    QuestionStarted,
    event_type = "game.question_started.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = started_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// QuestionResults
// ════════════════════════════════════════════════════════════════════════════

/// Published when a slide closes, revealing the answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResults {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub pin: String,
    pub slide_id: SlideId,
    pub correct_indices: Vec<usize>,
    pub scoreboard: Vec<ScoreboardEntry>,
    pub closed_at: Timestamp,
}

domain_event!(
    QuestionResults,
    event_type = "game.question_results.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = closed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// GameEnded
// ════════════════════════════════════════════════════════════════════════════

/// Published when the last slide has been played.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEnded {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub pin: String,
    pub scoreboard: Vec<ScoreboardEntry>,
    pub winner: Option<ScoreboardEntry>,
    pub ended_at: Timestamp,
}

domain_event!(
    GameEnded,
    event_type = "game.ended.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = ended_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainEvent, SerializableDomainEvent};

    #[test]
    fn game_ended_envelope_carries_version_and_payload() {
        let event = GameEnded {
            event_id: EventId::new(),
            session_id: SessionId::new(),
            pin: "123456".into(),
            scoreboard: vec![],
            winner: None,
            ended_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        assert_eq!(envelope.event_type, "game.ended.v1");
        assert_eq!(envelope.aggregate_type, "GameSession");
        assert_eq!(envelope.aggregate_id, event.aggregate_id());
        assert_eq!(envelope.payload["pin"], "123456");
    }
}
