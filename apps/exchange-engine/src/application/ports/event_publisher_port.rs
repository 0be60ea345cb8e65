//! Event Publisher Port (Driven Port)
//!
//! Interface for handing lifecycle events to delivery adapters.

use async_trait::async_trait;

use crate::domain::exchange::events::ExchangeEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// The delivery queue cannot accept more events.
    #[error("Event queue full: {message}")]
    QueueFull { message: String },

    /// The delivery side has shut down.
    #[error("Event channel closed: {message}")]
    ChannelClosed { message: String },

    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError { message: String },
}

/// Port for publishing exchange lifecycle events.
///
/// Publishing is fire-and-forget from the engine's point of view: a
/// failed publish is logged by the caller and never rolls back the
/// state change that produced the event.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish exchange events.
    async fn publish_exchange_events(
        &self,
        events: Vec<ExchangeEvent>,
    ) -> Result<(), EventPublishError>;

    /// Publish a single exchange event.
    async fn publish_exchange_event(
        &self,
        event: ExchangeEvent,
    ) -> Result<(), EventPublishError> {
        self.publish_exchange_events(vec![event]).await
    }
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_exchange_events(
        &self,
        _events: Vec<ExchangeEvent>,
    ) -> Result<(), EventPublishError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exchange::aggregate::{CreateApplicationCommand, ExchangeApplication};
    use crate::domain::shared::{Credits, LeadId, UserId};

    fn make_event() -> ExchangeEvent {
        let app = ExchangeApplication::new(CreateApplicationCommand {
            applicant_id: UserId::new("applicant"),
            target_lead_id: LeadId::new("target-lead"),
            target_owner_id: UserId::new("owner"),
            offered_lead_ids: vec![LeadId::new("lead-1")],
            additional_credits: Credits::ZERO,
            reason: "trade".to_string(),
        })
        .unwrap();

        ExchangeEvent::submitted(&app)
    }

    #[tokio::test]
    async fn no_op_publisher_succeeds() {
        let publisher = NoOpEventPublisher;

        let result = publisher.publish_exchange_event(make_event()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn no_op_publisher_multiple_events() {
        let publisher = NoOpEventPublisher;

        let result = publisher
            .publish_exchange_events(vec![make_event(), make_event()])
            .await;
        assert!(result.is_ok());
    }
}
