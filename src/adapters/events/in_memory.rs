//! In-memory event bus.
//!
//! Fans published events out to in-process subscribers (the gateway layer)
//! over a broadcast channel and keeps a bounded history for inspection.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::broadcast;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// Default number of events kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// In-process event bus.
///
/// Features:
/// - Broadcast delivery to any number of subscribers
/// - Bounded history for assertions and diagnostics
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// let mut rx = bus.subscribe();
///
/// bus.publish(envelope).await?;
///
/// assert!(bus.has_event("game.session_created.v1"));
/// let received = rx.recv().await?;
/// ```
pub struct InMemoryEventBus {
    sender: broadcast::Sender<EventEnvelope>,
    history: Mutex<VecDeque<EventEnvelope>>,
    history_limit: usize,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        let (sender, _) = broadcast::channel(history_limit.max(1));
        Self {
            sender,
            history: Mutex::new(VecDeque::new()),
            history_limit,
        }
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Events in publish order, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.history().iter().cloned().collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.history()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.history()
            .iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .cloned()
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.history().len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.history().iter().any(|e| e.event_type == event_type)
    }

    pub fn clear(&self) {
        self.history().clear();
    }

    fn history(&self) -> std::sync::MutexGuard<'_, VecDeque<EventEnvelope>> {
        // A panic while holding the lock cannot leave the deque half-written.
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        {
            let mut history = self.history();
            if self.history_limit > 0 {
                if history.len() == self.history_limit {
                    history.pop_front();
                }
                history.push_back(event.clone());
            }
        }

        // No subscribers is not an error.
        let _ = self.sender.send(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
