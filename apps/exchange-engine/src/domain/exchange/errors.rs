//! Exchange engine errors.

use std::fmt;

use super::value_objects::ExchangeStatus;

/// Errors that can occur while brokering an exchange.
///
/// `Conflict` is the only retryable variant: callers re-read and re-attempt,
/// and the expiry sweep simply picks the item up on its next run. Everything
/// else is surfaced to the caller as a rejected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Referenced lead or application does not exist.
    NotFound {
        /// Entity type (e.g., "lead", "application").
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// Malformed or inadmissible input (self-exchange, empty offer, ...).
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// Actor is not the required party for the attempted transition.
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The event is not legal from the current status.
    InvalidStateTransition {
        /// Current application status.
        from: ExchangeStatus,
        /// Attempted event name.
        event: String,
    },

    /// Concurrent-write version mismatch; re-read and retry.
    Conflict {
        /// Application identifier.
        application_id: String,
        /// Version the writer held.
        expected_version: u64,
    },

    /// Persistence-layer failure.
    Storage {
        /// Error message.
        message: String,
    },
}

impl ExchangeError {
    /// Returns true if the caller may retry after re-reading.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => {
                write!(f, "{entity} not found: {id}")
            }
            Self::InvalidArgument { message } => {
                write!(f, "Invalid argument: {message}")
            }
            Self::Unauthorized { message } => {
                write!(f, "Unauthorized: {message}")
            }
            Self::InvalidStateTransition { from, event } => {
                write!(f, "Invalid state transition: {event} not allowed from {from}")
            }
            Self::Conflict {
                application_id,
                expected_version,
            } => {
                write!(
                    f,
                    "Write conflict on application {application_id} (stale version {expected_version})"
                )
            }
            Self::Storage { message } => {
                write!(f, "Storage error: {message}")
            }
        }
    }
}

impl std::error::Error for ExchangeError {}
