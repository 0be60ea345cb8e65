//! Application-layer DTOs

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Credits, LeadId, UserId};

/// Request to open a new exchange application.
///
/// The target owner is resolved from the lead catalog, never trusted
/// from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    /// User proposing the trade.
    pub applicant_id: UserId,
    /// Lead being requested.
    pub target_lead_id: LeadId,
    /// Leads offered in exchange, in offer order.
    pub offered_lead_ids: Vec<LeadId>,
    /// Credit top-up offered alongside the leads.
    #[serde(default)]
    pub additional_credits: Credits,
    /// Applicant's rationale for the trade.
    #[serde(default)]
    pub reason: String,
}
