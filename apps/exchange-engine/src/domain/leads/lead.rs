//! Lead read model.
//!
//! Leads are owned by the lead management subsystem; the exchange engine
//! only reads identifier, owner, and rating.

use serde::{Deserialize, Serialize};

use super::LeadRating;
use crate::domain::shared::{LeadId, UserId};

/// A sales/investment opportunity record, read-only to the exchange engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Lead identifier.
    pub id: LeadId,
    /// Current owner of the lead.
    pub owner_id: UserId,
    /// Quality rating. Absent when the lead has not been rated yet.
    pub rating: Option<LeadRating>,
}

impl Lead {
    /// Create a new lead read model.
    #[must_use]
    pub const fn new(id: LeadId, owner_id: UserId, rating: Option<LeadRating>) -> Self {
        Self {
            id,
            owner_id,
            rating,
        }
    }

    /// Check whether the lead is owned by the given user.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_is_owned_by() {
        let lead = Lead::new(
            LeadId::new("lead-1"),
            UserId::new("user-1"),
            Some(LeadRating::A),
        );

        assert!(lead.is_owned_by(&UserId::new("user-1")));
        assert!(!lead.is_owned_by(&UserId::new("user-2")));
    }

    #[test]
    fn lead_without_rating() {
        let lead = Lead::new(LeadId::new("lead-1"), UserId::new("user-1"), None);
        assert!(lead.rating.is_none());
    }

    #[test]
    fn lead_serde_roundtrip() {
        let lead = Lead::new(
            LeadId::new("lead-1"),
            UserId::new("user-1"),
            Some(LeadRating::B),
        );

        let json = serde_json::to_string(&lead).unwrap();
        let parsed: Lead = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lead);
    }
}
