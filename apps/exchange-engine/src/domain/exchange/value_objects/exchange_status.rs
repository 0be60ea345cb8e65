//! Exchange application status in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an exchange application.
///
/// `Pending` is the only non-terminal review state. `Approved` admits one
/// further transition (settlement to `Completed`); every other state is
/// terminal. Terminal applications are retained for audit, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeStatus {
    /// Application submitted, awaiting the target owner's response.
    Pending,
    /// Target owner agreed to the trade; settlement pending.
    Approved,
    /// Target owner declined the trade.
    Rejected,
    /// Applicant withdrew the application.
    Cancelled,
    /// Application aged past the configured TTL without a response.
    Expired,
    /// Settlement acknowledged; the trade is done.
    Completed,
}

impl ExchangeStatus {
    /// Returns true if no further transition is possible from this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Cancelled | Self::Expired | Self::Completed
        )
    }

    /// Returns true if the application can be approved or rejected.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the applicant can still withdraw the application.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the expiry sweep may transition this application.
    #[must_use]
    pub const fn can_expire(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if settlement can complete the application.
    #[must_use]
    pub const fn can_complete(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}
