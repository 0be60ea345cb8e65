//! Application Repository Trait
//!
//! Defines the persistence abstraction for exchange applications.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::aggregate::ExchangeApplication;
use super::errors::ExchangeError;
use crate::domain::shared::{ApplicationId, Page, PageRequest, Timestamp, UserId};

/// Repository trait for exchange application persistence.
///
/// This is a domain interface (port) that is implemented by
/// infrastructure adapters (in-memory, SQL, etc.).
///
/// `save` is version-checked: the write succeeds only when the caller's
/// version stamp matches the stored one, and the returned aggregate
/// carries the incremented stamp. Applications are never deleted.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist an application, checking its version stamp.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the stored version differs from the
    /// application's, or error if persistence fails.
    async fn save(
        &self,
        application: &ExchangeApplication,
    ) -> Result<ExchangeApplication, ExchangeError>;

    /// Persist a batch of applications, each individually version-checked.
    ///
    /// # Errors
    ///
    /// Returns error on the first conflicting or failing write; prior
    /// writes in the batch remain applied.
    async fn save_all(
        &self,
        applications: &[ExchangeApplication],
    ) -> Result<Vec<ExchangeApplication>, ExchangeError>;

    /// Find an application by its ID.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ExchangeApplication>, ExchangeError>;

    /// Page through a user's submitted applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_applicant(
        &self,
        applicant_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<ExchangeApplication>, ExchangeError>;

    /// Page through applications targeting a user's leads, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_target_owner(
        &self,
        target_owner_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<ExchangeApplication>, ExchangeError>;

    /// Whether the applicant already has a pending application for the lead.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn exists_pending(
        &self,
        applicant_id: &UserId,
        target_lead_id: &crate::domain::shared::LeadId,
    ) -> Result<bool, ExchangeError>;

    /// Find pending applications created at or before the cutoff.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_expired(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ExchangeApplication>, ExchangeError>;
}
