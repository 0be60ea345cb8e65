//! Exchange Domain Events
//!
//! Events describe lifecycle facts after they have been persisted. Each
//! event carries the recipients it should be delivered to; the publisher
//! never recomputes them.

use serde::{Deserialize, Serialize};

use crate::domain::exchange::aggregate::ExchangeApplication;
use crate::domain::shared::{Timestamp, UserId};

/// The kind of lifecycle fact an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeEventType {
    /// A new application was submitted.
    ApplicationSubmitted,
    /// The target owner approved the application.
    ApplicationApproved,
    /// The target owner rejected the application.
    ApplicationRejected,
    /// The applicant withdrew the application.
    ApplicationCancelled,
    /// An approved application was settled.
    ExchangeCompleted,
    /// A pending application aged past its TTL.
    ExchangeExpired,
}

impl ExchangeEventType {
    /// Wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationSubmitted => "APPLICATION_SUBMITTED",
            Self::ApplicationApproved => "APPLICATION_APPROVED",
            Self::ApplicationRejected => "APPLICATION_REJECTED",
            Self::ApplicationCancelled => "APPLICATION_CANCELLED",
            Self::ExchangeCompleted => "EXCHANGE_COMPLETED",
            Self::ExchangeExpired => "EXCHANGE_EXPIRED",
        }
    }
}

impl std::fmt::Display for ExchangeEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lifecycle event with its delivery plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEvent {
    /// What happened.
    pub event_type: ExchangeEventType,
    /// Snapshot of the application as persisted.
    pub application: ExchangeApplication,
    /// Users the event should be delivered to.
    pub recipients: Vec<UserId>,
    /// The user whose action produced the event, if any. Sweeps have none.
    pub operator_id: Option<UserId>,
    /// Free-form note, such as the reviewer's message.
    pub remark: Option<String>,
    /// When the event was produced.
    pub occurred_at: Timestamp,
}

impl ExchangeEvent {
    /// A fresh application was submitted; notify the target owner.
    #[must_use]
    pub fn submitted(application: &ExchangeApplication) -> Self {
        Self::build(
            ExchangeEventType::ApplicationSubmitted,
            application,
            vec![application.target_owner_id().clone()],
            Some(application.applicant_id().clone()),
            None,
        )
    }

    /// The target owner approved; notify the applicant.
    #[must_use]
    pub fn approved(application: &ExchangeApplication, operator_id: UserId) -> Self {
        Self::build(
            ExchangeEventType::ApplicationApproved,
            application,
            vec![application.applicant_id().clone()],
            Some(operator_id),
            application.response_message().map(str::to_string),
        )
    }

    /// The target owner rejected; notify the applicant.
    #[must_use]
    pub fn rejected(application: &ExchangeApplication, operator_id: UserId) -> Self {
        Self::build(
            ExchangeEventType::ApplicationRejected,
            application,
            vec![application.applicant_id().clone()],
            Some(operator_id),
            application.response_message().map(str::to_string),
        )
    }

    /// A party withdrew; notify both parties except the actor.
    #[must_use]
    pub fn cancelled(application: &ExchangeApplication, operator_id: UserId) -> Self {
        let recipients = [
            application.applicant_id().clone(),
            application.target_owner_id().clone(),
        ]
        .into_iter()
        .filter(|user| *user != operator_id)
        .collect();

        Self::build(
            ExchangeEventType::ApplicationCancelled,
            application,
            recipients,
            Some(operator_id),
            None,
        )
    }

    /// The exchange settled; notify both parties.
    #[must_use]
    pub fn completed(application: &ExchangeApplication, operator_id: Option<UserId>) -> Self {
        Self::build(
            ExchangeEventType::ExchangeCompleted,
            application,
            Self::both_parties(application),
            operator_id,
            None,
        )
    }

    /// The application expired during a sweep; notify both parties.
    #[must_use]
    pub fn expired(application: &ExchangeApplication) -> Self {
        Self::build(
            ExchangeEventType::ExchangeExpired,
            application,
            Self::both_parties(application),
            None,
            None,
        )
    }

    fn both_parties(application: &ExchangeApplication) -> Vec<UserId> {
        vec![
            application.applicant_id().clone(),
            application.target_owner_id().clone(),
        ]
    }

    fn build(
        event_type: ExchangeEventType,
        application: &ExchangeApplication,
        recipients: Vec<UserId>,
        operator_id: Option<UserId>,
        remark: Option<String>,
    ) -> Self {
        Self {
            event_type,
            application: application.clone(),
            recipients,
            operator_id,
            remark,
            occurred_at: Timestamp::now(),
        }
    }
}
