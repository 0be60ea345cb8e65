//! Valuation table mapping lead ratings to point values.

use serde::{Deserialize, Serialize};

use crate::domain::leads::LeadRating;
use crate::domain::shared::Credits;

/// Immutable rating-to-points mapping, loaded once at startup.
///
/// The design mapping for this domain is A=8, B=4, C=2, D=1. Deployments
/// may override individual values through configuration, but the table
/// never changes after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationTable {
    /// Points for an A-rated lead.
    pub a: u32,
    /// Points for a B-rated lead.
    pub b: u32,
    /// Points for a C-rated lead.
    pub c: u32,
    /// Points for a D-rated lead.
    pub d: u32,
}

impl ValuationTable {
    /// Build a table from explicit per-rating values.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    /// Point value of a rating. Pure lookup, no side effects.
    #[must_use]
    pub const fn value_of(&self, rating: LeadRating) -> u32 {
        match rating {
            LeadRating::A => self.a,
            LeadRating::B => self.b,
            LeadRating::C => self.c,
            LeadRating::D => self.d,
        }
    }

    /// Point value of an optional rating; an unrated lead is worth 0.
    #[must_use]
    pub const fn value_of_opt(&self, rating: Option<LeadRating>) -> u32 {
        match rating {
            Some(r) => self.value_of(r),
            None => 0,
        }
    }

    /// Point value of a rating as credits.
    #[must_use]
    pub fn credits_of(&self, rating: LeadRating) -> Credits {
        Credits::from_points(self.value_of(rating))
    }
}

impl Default for ValuationTable {
    /// The fixed design mapping: A=8, B=4, C=2, D=1.
    fn default() -> Self {
        Self::new(8, 4, 2, 1)
    }
}
