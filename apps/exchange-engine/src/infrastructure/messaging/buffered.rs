//! Buffered event publisher.
//!
//! Decouples the engine from event delivery with a bounded channel: the
//! engine's publish call never blocks, and a full queue drops the event
//! with an error the caller logs. A worker task drains the receiver into
//! whatever transport the deployment wires up.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::exchange::events::ExchangeEvent;

/// Bounded-queue publisher backed by a tokio mpsc channel.
#[derive(Debug, Clone)]
pub struct BufferedEventPublisher {
    tx: mpsc::Sender<ExchangeEvent>,
}

impl BufferedEventPublisher {
    /// Create a publisher with the given queue capacity, returning the
    /// receiving end for a drain worker.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ExchangeEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventPublisherPort for BufferedEventPublisher {
    async fn publish_exchange_events(
        &self,
        events: Vec<ExchangeEvent>,
    ) -> Result<(), EventPublishError> {
        for event in events {
            self.tx.try_send(event).map_err(|error| match error {
                mpsc::error::TrySendError::Full(event) => EventPublishError::QueueFull {
                    message: format!("dropping {} event", event.event_type),
                },
                mpsc::error::TrySendError::Closed(event) => EventPublishError::ChannelClosed {
                    message: format!("dropping {} event", event.event_type),
                },
            })?;
        }
        Ok(())
    }
}

/// Drain worker that logs each event as its delivery.
///
/// Stands in for a real notification transport; runs until the sending
/// side is dropped.
pub async fn run_event_logger(mut rx: mpsc::Receiver<ExchangeEvent>) {
    while let Some(event) = rx.recv().await {
        for recipient in &event.recipients {
            tracing::info!(
                event_type = %event.event_type,
                application_id = %event.application.id(),
                recipient = %recipient,
                remark = event.remark.as_deref().unwrap_or(""),
                "Exchange event delivered"
            );
        }
    }
    tracing::debug!("Event logger drained and stopped");
}
