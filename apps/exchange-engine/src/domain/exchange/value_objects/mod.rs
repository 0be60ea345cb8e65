//! Exchange Value Objects
//!
//! Immutable types for exchange application management.

mod exchange_status;

pub use exchange_status::ExchangeStatus;
