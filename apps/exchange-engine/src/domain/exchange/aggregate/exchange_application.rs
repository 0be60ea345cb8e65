//! Exchange Application Aggregate Root
//!
//! The aggregate owns the lifecycle transition rules. Actor-identity guards
//! (who may approve, reject, or cancel) live in the engine; the aggregate
//! enforces which events are legal from the current status and keeps every
//! timestamp set exactly once.

use serde::{Deserialize, Serialize};

use crate::domain::exchange::errors::ExchangeError;
use crate::domain::exchange::value_objects::ExchangeStatus;
use crate::domain::shared::{ApplicationId, Credits, LeadId, Timestamp, UserId};

/// Command to create a new exchange application.
#[derive(Debug, Clone)]
pub struct CreateApplicationCommand {
    /// User proposing the trade.
    pub applicant_id: UserId,
    /// Lead being requested.
    pub target_lead_id: LeadId,
    /// Current owner of the requested lead.
    pub target_owner_id: UserId,
    /// Leads offered in exchange, in offer order.
    pub offered_lead_ids: Vec<LeadId>,
    /// Credit top-up offered alongside the leads.
    pub additional_credits: Credits,
    /// Applicant's rationale for the trade.
    pub reason: String,
}

impl CreateApplicationCommand {
    /// Validate the command parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a self-exchange, a negative credit
    /// top-up, or an offer that includes the target lead itself.
    pub fn validate(&self) -> Result<(), ExchangeError> {
        if self.applicant_id == self.target_owner_id {
            return Err(ExchangeError::InvalidArgument {
                message: "cannot apply to exchange for your own lead".to_string(),
            });
        }

        if self.additional_credits.is_negative() {
            return Err(ExchangeError::InvalidArgument {
                message: "credit top-up cannot be negative".to_string(),
            });
        }

        if self.offered_lead_ids.contains(&self.target_lead_id) {
            return Err(ExchangeError::InvalidArgument {
                message: "target lead cannot be part of the offer".to_string(),
            });
        }

        Ok(())
    }
}

/// Parameters for reconstituting an application from storage.
///
/// Used by repositories to rebuild aggregates from persisted state.
#[derive(Debug, Clone)]
pub struct ReconstitutedApplicationParams {
    /// Application identifier.
    pub id: ApplicationId,
    /// Applicant.
    pub applicant_id: UserId,
    /// Requested lead.
    pub target_lead_id: LeadId,
    /// Owner of the requested lead.
    pub target_owner_id: UserId,
    /// Offered leads.
    pub offered_lead_ids: Vec<LeadId>,
    /// Credit top-up.
    pub additional_credits: Credits,
    /// Current status.
    pub status: ExchangeStatus,
    /// Applicant rationale.
    pub reason: String,
    /// Reviewer rationale, if reviewed.
    pub response_message: Option<String>,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Review timestamp, if reviewed.
    pub reviewed_at: Option<Timestamp>,
    /// Settlement timestamp, if completed.
    pub completed_at: Option<Timestamp>,
    /// Optimistic lock stamp.
    pub version: u64,
}

/// Exchange Application Aggregate Root.
///
/// Created in `Pending` and mutated only through the transition methods;
/// never physically deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeApplication {
    id: ApplicationId,
    applicant_id: UserId,
    target_lead_id: LeadId,
    target_owner_id: UserId,
    offered_lead_ids: Vec<LeadId>,
    additional_credits: Credits,
    status: ExchangeStatus,
    reason: String,
    response_message: Option<String>,
    created_at: Timestamp,
    reviewed_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    version: u64,
}

impl ExchangeApplication {
    /// Create a new application in `Pending` status.
    ///
    /// Duplicate offered lead ids are collapsed, preserving offer order.
    ///
    /// # Errors
    ///
    /// Returns error if command validation fails.
    pub fn new(cmd: CreateApplicationCommand) -> Result<Self, ExchangeError> {
        cmd.validate()?;

        let mut offered = Vec::with_capacity(cmd.offered_lead_ids.len());
        for id in cmd.offered_lead_ids {
            if !offered.contains(&id) {
                offered.push(id);
            }
        }

        Ok(Self {
            id: ApplicationId::generate(),
            applicant_id: cmd.applicant_id,
            target_lead_id: cmd.target_lead_id,
            target_owner_id: cmd.target_owner_id,
            offered_lead_ids: offered,
            additional_credits: cmd.additional_credits,
            status: ExchangeStatus::Pending,
            reason: cmd.reason,
            response_message: None,
            created_at: Timestamp::now(),
            reviewed_at: None,
            completed_at: None,
            version: 0,
        })
    }

    /// Reconstitute an application from stored state.
    #[must_use]
    pub fn reconstitute(params: ReconstitutedApplicationParams) -> Self {
        Self {
            id: params.id,
            applicant_id: params.applicant_id,
            target_lead_id: params.target_lead_id,
            target_owner_id: params.target_owner_id,
            offered_lead_ids: params.offered_lead_ids,
            additional_credits: params.additional_credits,
            status: params.status,
            reason: params.reason,
            response_message: params.response_message,
            created_at: params.created_at,
            reviewed_at: params.reviewed_at,
            completed_at: params.completed_at,
            version: params.version,
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the application ID.
    #[must_use]
    pub const fn id(&self) -> &ApplicationId {
        &self.id
    }

    /// Get the applicant.
    #[must_use]
    pub const fn applicant_id(&self) -> &UserId {
        &self.applicant_id
    }

    /// Get the requested lead.
    #[must_use]
    pub const fn target_lead_id(&self) -> &LeadId {
        &self.target_lead_id
    }

    /// Get the owner of the requested lead.
    #[must_use]
    pub const fn target_owner_id(&self) -> &UserId {
        &self.target_owner_id
    }

    /// Get the offered leads, in offer order.
    #[must_use]
    pub fn offered_lead_ids(&self) -> &[LeadId] {
        &self.offered_lead_ids
    }

    /// Get the credit top-up.
    #[must_use]
    pub const fn additional_credits(&self) -> Credits {
        self.additional_credits
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> ExchangeStatus {
        self.status
    }

    /// Get the applicant's rationale.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Get the reviewer's rationale, if any.
    #[must_use]
    pub fn response_message(&self) -> Option<&str> {
        self.response_message.as_deref()
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the review timestamp, if reviewed.
    #[must_use]
    pub const fn reviewed_at(&self) -> Option<Timestamp> {
        self.reviewed_at
    }

    /// Get the settlement timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Get the optimistic lock stamp.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Replace the version stamp.
    ///
    /// For persistence adapters only: the stamp is incremented on every
    /// successful write and checked against the stored value to detect
    /// stale writers.
    #[must_use]
    pub const fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Whether the application has aged past the given TTL.
    #[must_use]
    pub fn is_stale(&self, now: Timestamp, ttl: chrono::Duration) -> bool {
        self.status.can_expire() && now.duration_since(self.created_at) > ttl
    }

    // ========================================================================
    // State Transitions
    // ========================================================================

    /// Approve the application. Sets `reviewed_at` once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the status is `Pending`.
    pub fn approve(&mut self, response_message: impl Into<String>) -> Result<(), ExchangeError> {
        if !self.status.can_review() {
            return Err(self.transition_error("approve"));
        }

        self.status = ExchangeStatus::Approved;
        self.response_message = Some(response_message.into());
        self.reviewed_at = Some(Timestamp::now());
        Ok(())
    }

    /// Reject the application. Sets `reviewed_at` once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the status is `Pending`.
    pub fn reject(&mut self, response_message: impl Into<String>) -> Result<(), ExchangeError> {
        if !self.status.can_review() {
            return Err(self.transition_error("reject"));
        }

        self.status = ExchangeStatus::Rejected;
        self.response_message = Some(response_message.into());
        self.reviewed_at = Some(Timestamp::now());
        Ok(())
    }

    /// Withdraw the application.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the status is `Pending`.
    pub fn cancel(&mut self) -> Result<(), ExchangeError> {
        if !self.status.can_cancel() {
            return Err(self.transition_error("cancel"));
        }

        self.status = ExchangeStatus::Cancelled;
        Ok(())
    }

    /// Expire the application. No silent no-op: expiring a non-pending
    /// application is an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the status is `Pending`.
    pub fn expire(&mut self) -> Result<(), ExchangeError> {
        if !self.status.can_expire() {
            return Err(self.transition_error("expire"));
        }

        self.status = ExchangeStatus::Expired;
        Ok(())
    }

    /// Complete the application after settlement. Sets `completed_at` once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` unless the status is `Approved`.
    pub fn complete(&mut self) -> Result<(), ExchangeError> {
        if !self.status.can_complete() {
            return Err(self.transition_error("complete"));
        }

        self.status = ExchangeStatus::Completed;
        self.completed_at = Some(Timestamp::now());
        Ok(())
    }

    fn transition_error(&self, event: &str) -> ExchangeError {
        ExchangeError::InvalidStateTransition {
            from: self.status,
            event: event.to_string(),
        }
    }
}
