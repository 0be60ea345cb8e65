//! Application Ports
//!
//! Driven-port interfaces the engine depends on, implemented by
//! infrastructure adapters.

pub mod event_publisher_port;
pub mod lead_read_port;

pub use event_publisher_port::{EventPublishError, EventPublisherPort, NoOpEventPublisher};
pub use lead_read_port::{LeadReadError, LeadReadPort};
