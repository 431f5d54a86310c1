//! EventPublisher port - Interface for publishing game events.
//!
//! Handlers publish events without knowing how they reach the gateway
//! layer (in-process bus, message broker, ...).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing game events.
///
/// Implementations must ensure:
/// - Events for one session are delivered in publish order
/// - Errors are propagated to the caller
///
/// # Example
///
/// ```ignore
/// publisher.publish(question_started.to_envelope()).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order.
    ///
    /// Adapters without batch support publish sequentially and stop at the
    /// first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
