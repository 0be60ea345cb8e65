//! Recording event publisher for test assertions.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::exchange::events::ExchangeEvent;

/// Captures every published event for later inspection.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<ExchangeEvent>>,
}

impl RecordingEventPublisher {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, in publish order.
    #[must_use]
    pub fn recorded(&self) -> Vec<ExchangeEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisherPort for RecordingEventPublisher {
    async fn publish_exchange_events(
        &self,
        events: Vec<ExchangeEvent>,
    ) -> Result<(), EventPublishError> {
        self.events.lock().unwrap().extend(events);
        Ok(())
    }
}
