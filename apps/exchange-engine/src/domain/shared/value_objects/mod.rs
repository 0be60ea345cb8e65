//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod credits;
mod identifiers;
mod pagination;
mod timestamp;

pub use credits::Credits;
pub use identifiers::{ApplicationId, LeadId, UserId};
pub use pagination::{Page, PageRequest};
pub use timestamp::Timestamp;
