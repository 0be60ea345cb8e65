//! Messaging Adapters

pub mod buffered;
pub mod recording;

pub use buffered::{BufferedEventPublisher, run_event_logger};
pub use recording::RecordingEventPublisher;
