//! Leads Bounded Context (read-only)
//!
//! The exchange engine does not own leads. This module holds the narrow
//! read model the engine needs: identifier, owner, and quality rating.

mod lead;
mod rating;

pub use lead::Lead;
pub use rating::LeadRating;
