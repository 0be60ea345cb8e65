//! Lead Read Port (Driven Port)
//!
//! Read-only lookup of leads and their ratings. The engine never
//! mutates lead ownership; settlement happens elsewhere.

use async_trait::async_trait;

use crate::domain::leads::Lead;
use crate::domain::shared::LeadId;

/// Lead lookup error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LeadReadError {
    /// The lead catalog could not be queried.
    #[error("Lead lookup failed: {message}")]
    LookupFailed { message: String },
}

/// Port for reading leads from the owning catalog.
#[async_trait]
pub trait LeadReadPort: Send + Sync {
    /// Find a lead by its ID.
    ///
    /// # Errors
    ///
    /// Returns error if the lookup fails. A missing lead is `Ok(None)`.
    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, LeadReadError>;

    /// Find all of the given leads, skipping ids that do not exist.
    ///
    /// # Errors
    ///
    /// Returns error if the lookup fails.
    async fn find_all_by_id(&self, ids: &[LeadId]) -> Result<Vec<Lead>, LeadReadError>;
}
