//! In-memory persistence adapters for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{LeadReadError, LeadReadPort};
use crate::domain::exchange::aggregate::{ExchangeApplication, ReconstitutedApplicationParams};
use crate::domain::exchange::errors::ExchangeError;
use crate::domain::exchange::repository::ApplicationRepository;
use crate::domain::exchange::value_objects::ExchangeStatus;
use crate::domain::leads::Lead;
use crate::domain::shared::{ApplicationId, LeadId, Page, PageRequest, Timestamp, UserId};

/// In-memory implementation of `ApplicationRepository`.
///
/// Version-checked like a real store: a save only succeeds when the
/// writer's version stamp matches the stored one, and the stored copy
/// gets the incremented stamp. Suitable for testing and development.
#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    applications: RwLock<HashMap<String, ExchangeApplication>>,
}

impl InMemoryApplicationRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            applications: RwLock::new(HashMap::new()),
        }
    }

    /// Get the number of stored applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.applications.read().unwrap().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applications.read().unwrap().is_empty()
    }

    /// Shift a stored application's creation time into the past
    /// (for test setup of expiry scenarios).
    pub fn backdate_created_at(&self, id: &ApplicationId, by: chrono::Duration) {
        let mut applications = self.applications.write().unwrap();
        if let Some(stored) = applications.get(id.as_str()) {
            let backdated = ExchangeApplication::reconstitute(ReconstitutedApplicationParams {
                id: stored.id().clone(),
                applicant_id: stored.applicant_id().clone(),
                target_lead_id: stored.target_lead_id().clone(),
                target_owner_id: stored.target_owner_id().clone(),
                offered_lead_ids: stored.offered_lead_ids().to_vec(),
                additional_credits: stored.additional_credits(),
                status: stored.status(),
                reason: stored.reason().to_string(),
                response_message: stored.response_message().map(str::to_string),
                created_at: Timestamp::new(stored.created_at().as_datetime() - by),
                reviewed_at: stored.reviewed_at(),
                completed_at: stored.completed_at(),
                version: stored.version(),
            });
            applications.insert(id.as_str().to_string(), backdated);
        }
    }

    fn checked_insert(
        applications: &mut HashMap<String, ExchangeApplication>,
        application: &ExchangeApplication,
    ) -> Result<ExchangeApplication, ExchangeError> {
        if let Some(stored) = applications.get(application.id().as_str()) {
            if stored.version() != application.version() {
                return Err(ExchangeError::Conflict {
                    application_id: application.id().to_string(),
                    expected_version: application.version(),
                });
            }
        } else if application.version() != 0 {
            return Err(ExchangeError::Conflict {
                application_id: application.id().to_string(),
                expected_version: application.version(),
            });
        }

        let saved = application.clone().with_version(application.version() + 1);
        applications.insert(application.id().as_str().to_string(), saved.clone());
        Ok(saved)
    }

    fn page_sorted(
        mut matches: Vec<ExchangeApplication>,
        page: PageRequest,
    ) -> Page<ExchangeApplication> {
        matches.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Page::from_full_set(matches, page)
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn save(
        &self,
        application: &ExchangeApplication,
    ) -> Result<ExchangeApplication, ExchangeError> {
        let mut applications = self.applications.write().unwrap();
        Self::checked_insert(&mut applications, application)
    }

    async fn save_all(
        &self,
        batch: &[ExchangeApplication],
    ) -> Result<Vec<ExchangeApplication>, ExchangeError> {
        let mut applications = self.applications.write().unwrap();
        let mut saved = Vec::with_capacity(batch.len());
        for application in batch {
            saved.push(Self::checked_insert(&mut applications, application)?);
        }
        Ok(saved)
    }

    async fn find_by_id(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<ExchangeApplication>, ExchangeError> {
        let applications = self.applications.read().unwrap();
        Ok(applications.get(id.as_str()).cloned())
    }

    async fn find_by_applicant(
        &self,
        applicant_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<ExchangeApplication>, ExchangeError> {
        let applications = self.applications.read().unwrap();
        let matches = applications
            .values()
            .filter(|a| a.applicant_id() == applicant_id)
            .cloned()
            .collect();
        Ok(Self::page_sorted(matches, page))
    }

    async fn find_by_target_owner(
        &self,
        target_owner_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<ExchangeApplication>, ExchangeError> {
        let applications = self.applications.read().unwrap();
        let matches = applications
            .values()
            .filter(|a| a.target_owner_id() == target_owner_id)
            .cloned()
            .collect();
        Ok(Self::page_sorted(matches, page))
    }

    async fn exists_pending(
        &self,
        applicant_id: &UserId,
        target_lead_id: &LeadId,
    ) -> Result<bool, ExchangeError> {
        let applications = self.applications.read().unwrap();
        Ok(applications.values().any(|a| {
            a.status() == ExchangeStatus::Pending
                && a.applicant_id() == applicant_id
                && a.target_lead_id() == target_lead_id
        }))
    }

    async fn find_expired(
        &self,
        cutoff: Timestamp,
    ) -> Result<Vec<ExchangeApplication>, ExchangeError> {
        let applications = self.applications.read().unwrap();
        Ok(applications
            .values()
            .filter(|a| a.status() == ExchangeStatus::Pending && a.created_at() <= cutoff)
            .cloned()
            .collect())
    }
}

/// In-memory implementation of `LeadReadPort`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<HashMap<String, Lead>>,
}

impl InMemoryLeadStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            leads: RwLock::new(HashMap::new()),
        }
    }

    /// Add a lead to the store (for test setup).
    pub fn insert(&self, lead: Lead) {
        let mut leads = self.leads.write().unwrap();
        leads.insert(lead.id.as_str().to_string(), lead);
    }
}

#[async_trait]
impl LeadReadPort for InMemoryLeadStore {
    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, LeadReadError> {
        let leads = self.leads.read().unwrap();
        Ok(leads.get(id.as_str()).cloned())
    }

    async fn find_all_by_id(&self, ids: &[LeadId]) -> Result<Vec<Lead>, LeadReadError> {
        let leads = self.leads.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| leads.get(id.as_str()).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exchange::aggregate::CreateApplicationCommand;
    use crate::domain::shared::Credits;

    fn make_application(applicant: &str, target_lead: &str) -> ExchangeApplication {
        ExchangeApplication::new(CreateApplicationCommand {
            applicant_id: UserId::new(applicant),
            target_lead_id: LeadId::new(target_lead),
            target_owner_id: UserId::new("owner"),
            offered_lead_ids: vec![LeadId::new("offer-1")],
            additional_credits: Credits::ZERO,
            reason: "trade".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn save_increments_version_and_find_returns_it() {
        let repo = InMemoryApplicationRepository::new();
        let app = make_application("alice", "lead-1");

        let saved = repo.save(&app).await.unwrap();
        assert_eq!(saved.version(), 1);

        let found = repo.find_by_id(app.id()).await.unwrap().unwrap();
        assert_eq!(found.version(), 1);
    }

    #[tokio::test]
    async fn stale_version_conflicts_and_leaves_store_untouched() {
        let repo = InMemoryApplicationRepository::new();
        let app = make_application("alice", "lead-1");

        let mut first_writer = repo.save(&app).await.unwrap();
        let mut second_writer = first_writer.clone();

        first_writer.cancel().unwrap();
        repo.save(&first_writer).await.unwrap();

        second_writer.expire().unwrap();
        let err = repo.save(&second_writer).await.unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Conflict {
                expected_version: 1,
                ..
            }
        ));

        let stored = repo.find_by_id(app.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), ExchangeStatus::Cancelled);
        assert_eq!(stored.version(), 2);
    }

    #[tokio::test]
    async fn first_save_requires_version_zero() {
        let repo = InMemoryApplicationRepository::new();
        let app = make_application("alice", "lead-1").with_version(4);

        let err = repo.save(&app).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Conflict { .. }));
    }

    #[tokio::test]
    async fn save_all_stops_at_first_conflict_keeping_prior_writes() {
        let repo = InMemoryApplicationRepository::new();
        let good = make_application("alice", "lead-1");
        let stale = make_application("bob", "lead-2").with_version(7);

        let err = repo.save_all(&[good.clone(), stale]).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Conflict { .. }));

        // The first write in the batch stands.
        assert!(repo.find_by_id(good.id()).await.unwrap().is_some());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn pagination_orders_newest_first() {
        let repo = InMemoryApplicationRepository::new();

        let older = make_application("alice", "lead-1");
        repo.save(&older).await.unwrap();
        repo.backdate_created_at(older.id(), chrono::Duration::hours(1));

        let newer = make_application("alice", "lead-2");
        repo.save(&newer).await.unwrap();

        let page = repo
            .find_by_applicant(&UserId::new("alice"), PageRequest::new(1, 1))
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id(), newer.id());
    }

    #[tokio::test]
    async fn exists_pending_matches_applicant_and_lead() {
        let repo = InMemoryApplicationRepository::new();
        let app = make_application("alice", "lead-1");
        repo.save(&app).await.unwrap();

        assert!(repo
            .exists_pending(&UserId::new("alice"), &LeadId::new("lead-1"))
            .await
            .unwrap());
        assert!(!repo
            .exists_pending(&UserId::new("alice"), &LeadId::new("lead-2"))
            .await
            .unwrap());
        assert!(!repo
            .exists_pending(&UserId::new("bob"), &LeadId::new("lead-1"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn find_expired_skips_fresh_and_non_pending() {
        let repo = InMemoryApplicationRepository::new();

        let stale = make_application("alice", "lead-1");
        repo.save(&stale).await.unwrap();
        repo.backdate_created_at(stale.id(), chrono::Duration::hours(80));

        let fresh = make_application("alice", "lead-2");
        repo.save(&fresh).await.unwrap();

        let mut reviewed = repo.save(&make_application("alice", "lead-3")).await.unwrap();
        reviewed.cancel().unwrap();
        repo.save(&reviewed).await.unwrap();
        repo.backdate_created_at(reviewed.id(), chrono::Duration::hours(80));

        let cutoff = Timestamp::new(Timestamp::now().as_datetime() - chrono::Duration::hours(72));
        let expired = repo.find_expired(cutoff).await.unwrap();

        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id(), stale.id());
    }

    #[tokio::test]
    async fn lead_store_lookup_skips_missing_ids() {
        let store = InMemoryLeadStore::new();
        store.insert(Lead::new(LeadId::new("lead-1"), UserId::new("alice"), None));

        let found = store
            .find_all_by_id(&[LeadId::new("lead-1"), LeadId::new("missing")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        assert!(store.find_by_id(&LeadId::new("missing")).await.unwrap().is_none());
    }
}
