//! Exchange Engine
//!
//! Orchestrates the application lifecycle: validates offers against the
//! fairness rules, drives the aggregate's state machine, persists through
//! the repository, and hands lifecycle events to the publisher.
//!
//! Persistence strictly precedes event emission. A failed publish is
//! logged and dropped; the state change stands.

use std::sync::Arc;

use crate::application::dto::ApplyRequest;
use crate::application::ports::{EventPublisherPort, LeadReadError, LeadReadPort};
use crate::domain::exchange::aggregate::{CreateApplicationCommand, ExchangeApplication};
use crate::domain::exchange::errors::ExchangeError;
use crate::domain::exchange::events::ExchangeEvent;
use crate::domain::exchange::repository::ApplicationRepository;
use crate::domain::exchange::services::FairnessEvaluator;
use crate::domain::shared::{ApplicationId, Page, PageRequest, Timestamp, UserId};

/// Default time-to-live for a pending application.
pub const DEFAULT_EXPIRY_HOURS: i64 = 72;

/// Orchestrator for lead exchanges.
///
/// Generic over the lead-read port, the application repository, and the
/// event publisher so tests can plug in mocks.
pub struct ExchangeEngine<L, R, P>
where
    L: LeadReadPort,
    R: ApplicationRepository,
    P: EventPublisherPort,
{
    leads: Arc<L>,
    applications: Arc<R>,
    event_publisher: Arc<P>,
    fairness: FairnessEvaluator,
    expiry_ttl: chrono::Duration,
}

impl<L, R, P> ExchangeEngine<L, R, P>
where
    L: LeadReadPort,
    R: ApplicationRepository,
    P: EventPublisherPort,
{
    /// Create a new engine with the default 72-hour TTL.
    pub fn new(
        leads: Arc<L>,
        applications: Arc<R>,
        event_publisher: Arc<P>,
        fairness: FairnessEvaluator,
    ) -> Self {
        Self::with_expiry_ttl(
            leads,
            applications,
            event_publisher,
            fairness,
            chrono::Duration::hours(DEFAULT_EXPIRY_HOURS),
        )
    }

    /// Create a new engine with an explicit pending-application TTL.
    pub fn with_expiry_ttl(
        leads: Arc<L>,
        applications: Arc<R>,
        event_publisher: Arc<P>,
        fairness: FairnessEvaluator,
        expiry_ttl: chrono::Duration,
    ) -> Self {
        Self {
            leads,
            applications,
            event_publisher,
            fairness,
            expiry_ttl,
        }
    }

    /// Open a new exchange application.
    ///
    /// The offered package must pass the hard-floor fairness check, every
    /// offered lead must belong to the applicant, and the applicant may not
    /// already have a pending application for the same lead.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing target lead, `InvalidArgument` for an
    /// inadmissible offer, `Storage`/`Conflict` on persistence failure.
    pub async fn apply(&self, request: ApplyRequest) -> Result<ExchangeApplication, ExchangeError> {
        let target = self
            .leads
            .find_by_id(&request.target_lead_id)
            .await
            .map_err(lead_lookup_error)?
            .ok_or_else(|| ExchangeError::NotFound {
                entity: "lead".to_string(),
                id: request.target_lead_id.to_string(),
            })?;

        if self
            .applications
            .exists_pending(&request.applicant_id, &request.target_lead_id)
            .await?
        {
            return Err(ExchangeError::InvalidArgument {
                message: "a pending application for this lead already exists".to_string(),
            });
        }

        // Collapse duplicate offered ids up front so a repeated lead
        // cannot inflate the offered value.
        let mut offered_ids: Vec<_> = Vec::with_capacity(request.offered_lead_ids.len());
        for id in &request.offered_lead_ids {
            if !offered_ids.contains(id) {
                offered_ids.push(id.clone());
            }
        }

        let command = CreateApplicationCommand {
            applicant_id: request.applicant_id.clone(),
            target_lead_id: request.target_lead_id.clone(),
            target_owner_id: target.owner_id.clone(),
            offered_lead_ids: offered_ids.clone(),
            additional_credits: request.additional_credits,
            reason: request.reason,
        };
        command.validate()?;

        let offered = self
            .leads
            .find_all_by_id(&offered_ids)
            .await
            .map_err(lead_lookup_error)?;

        if offered.len() != offered_ids.len() {
            return Err(ExchangeError::InvalidArgument {
                message: "one or more offered leads do not exist".to_string(),
            });
        }

        if let Some(foreign) = offered
            .iter()
            .find(|lead| !lead.is_owned_by(&request.applicant_id))
        {
            return Err(ExchangeError::InvalidArgument {
                message: format!("offered lead {} is not owned by the applicant", foreign.id),
            });
        }

        let validation = self
            .fairness
            .validate(&offered, Some(&target), request.additional_credits);
        if !validation.valid {
            return Err(ExchangeError::InvalidArgument {
                message: validation.message,
            });
        }

        let application = ExchangeApplication::new(command)?;
        let saved = self.applications.save(&application).await?;

        tracing::info!(
            application_id = %saved.id(),
            applicant_id = %saved.applicant_id(),
            target_lead_id = %saved.target_lead_id(),
            "Exchange application submitted"
        );

        self.publish(ExchangeEvent::submitted(&saved)).await;
        Ok(saved)
    }

    /// Approve a pending application. Only the target owner may approve.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, `InvalidStateTransition`, or `Conflict`.
    pub async fn approve_exchange(
        &self,
        application_id: &ApplicationId,
        operator_id: &UserId,
        response_message: impl Into<String> + Send,
    ) -> Result<ExchangeApplication, ExchangeError> {
        let mut application = self.load(application_id).await?;

        if application.target_owner_id() != operator_id {
            return Err(ExchangeError::Unauthorized {
                message: "only the target owner may approve the application".to_string(),
            });
        }

        application.approve(response_message)?;
        let saved = self.applications.save(&application).await?;

        tracing::info!(
            application_id = %saved.id(),
            operator_id = %operator_id,
            "Exchange application approved"
        );

        self.publish(ExchangeEvent::approved(&saved, operator_id.clone()))
            .await;
        Ok(saved)
    }

    /// Reject a pending application. Only the target owner may reject.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, `InvalidStateTransition`, or `Conflict`.
    pub async fn reject_exchange(
        &self,
        application_id: &ApplicationId,
        operator_id: &UserId,
        response_message: impl Into<String> + Send,
    ) -> Result<ExchangeApplication, ExchangeError> {
        let mut application = self.load(application_id).await?;

        if application.target_owner_id() != operator_id {
            return Err(ExchangeError::Unauthorized {
                message: "only the target owner may reject the application".to_string(),
            });
        }

        application.reject(response_message)?;
        let saved = self.applications.save(&application).await?;

        tracing::info!(
            application_id = %saved.id(),
            operator_id = %operator_id,
            "Exchange application rejected"
        );

        self.publish(ExchangeEvent::rejected(&saved, operator_id.clone()))
            .await;
        Ok(saved)
    }

    /// Withdraw a pending application. Only the applicant may cancel.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Unauthorized`, `InvalidStateTransition`, or `Conflict`.
    pub async fn cancel_exchange(
        &self,
        application_id: &ApplicationId,
        operator_id: &UserId,
    ) -> Result<ExchangeApplication, ExchangeError> {
        let mut application = self.load(application_id).await?;

        if application.applicant_id() != operator_id {
            return Err(ExchangeError::Unauthorized {
                message: "only the applicant may cancel the application".to_string(),
            });
        }

        application.cancel()?;
        let saved = self.applications.save(&application).await?;

        tracing::info!(application_id = %saved.id(), "Exchange application cancelled");

        self.publish(ExchangeEvent::cancelled(&saved, operator_id.clone()))
            .await;
        Ok(saved)
    }

    /// Settle an approved application.
    ///
    /// Ownership transfer and credit movement happen elsewhere; this
    /// records the completion and notifies both parties.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidStateTransition`, or `Conflict`.
    pub async fn complete_exchange(
        &self,
        application_id: &ApplicationId,
        operator_id: Option<&UserId>,
    ) -> Result<ExchangeApplication, ExchangeError> {
        let mut application = self.load(application_id).await?;

        application.complete()?;
        let saved = self.applications.save(&application).await?;

        tracing::info!(application_id = %saved.id(), "Exchange completed");

        self.publish(ExchangeEvent::completed(&saved, operator_id.cloned()))
            .await;
        Ok(saved)
    }

    /// Expire pending applications older than the TTL.
    ///
    /// Each item is saved individually; conflicts and transition failures
    /// are logged and skipped, and the remainder of the batch proceeds.
    /// Returns the number of applications expired in this run, so a run
    /// over an already-swept window returns 0.
    ///
    /// # Errors
    ///
    /// Returns error only when the expired-candidate query itself fails.
    pub async fn process_expired_applications(&self) -> Result<u64, ExchangeError> {
        let cutoff = Timestamp::now().minus(self.expiry_ttl);
        let candidates = self.applications.find_expired(cutoff).await?;

        let mut expired_count = 0u64;
        for mut application in candidates {
            if let Err(error) = application.expire() {
                tracing::warn!(
                    application_id = %application.id(),
                    %error,
                    "Skipping expiry candidate"
                );
                continue;
            }

            match self.applications.save(&application).await {
                Ok(saved) => {
                    expired_count += 1;
                    self.publish(ExchangeEvent::expired(&saved)).await;
                }
                Err(error) if error.is_retryable() => {
                    tracing::warn!(
                        application_id = %application.id(),
                        %error,
                        "Concurrent write during expiry, will retry next sweep"
                    );
                }
                Err(error) => {
                    tracing::error!(
                        application_id = %application.id(),
                        %error,
                        "Failed to persist expiry"
                    );
                }
            }
        }

        if expired_count > 0 {
            tracing::info!(expired_count, "Expiry sweep finished");
        }
        Ok(expired_count)
    }

    /// Look up a single application.
    ///
    /// # Errors
    ///
    /// `NotFound` if the application does not exist.
    pub async fn get_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ExchangeApplication, ExchangeError> {
        self.load(application_id).await
    }

    /// Page through the applications a user has submitted, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn get_user_applications(
        &self,
        applicant_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<ExchangeApplication>, ExchangeError> {
        self.applications.find_by_applicant(applicant_id, page).await
    }

    /// Page through the applications targeting a user's leads, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn get_received_applications(
        &self,
        target_owner_id: &UserId,
        page: PageRequest,
    ) -> Result<Page<ExchangeApplication>, ExchangeError> {
        self.applications
            .find_by_target_owner(target_owner_id, page)
            .await
    }

    async fn load(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ExchangeApplication, ExchangeError> {
        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| ExchangeError::NotFound {
                entity: "application".to_string(),
                id: application_id.to_string(),
            })
    }

    async fn publish(&self, event: ExchangeEvent) {
        if let Err(error) = self.event_publisher.publish_exchange_event(event).await {
            tracing::error!(%error, "Failed to publish exchange event");
        }
    }
}

fn lead_lookup_error(error: LeadReadError) -> ExchangeError {
    ExchangeError::Storage {
        message: error.to_string(),
    }
}
