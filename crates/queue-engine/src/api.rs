//! Request and response shapes for the service layer in front of the engine

use serde::{Deserialize, Serialize};

use crate::error::QueueError;
use crate::queue::{ClinicId, JoinOutcome, PositionInfo, TicketId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub user_name: String,
    pub clinic_id: ClinicId,
    /// Emergency patients are prioritized
    #[serde(default)]
    pub is_emergency: bool,
}

/// Returned by join and by position checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueResponse {
    pub ticket_id: TicketId,
    pub position: u32,
    /// Minutes
    pub estimated_wait: u32,
}

impl From<JoinOutcome> for QueueResponse {
    fn from(outcome: JoinOutcome) -> Self {
        Self {
            ticket_id: outcome.ticket_id,
            position: outcome.position,
            estimated_wait: outcome.estimated_wait,
        }
    }
}

impl From<PositionInfo> for QueueResponse {
    fn from(info: PositionInfo) -> Self {
        Self {
            ticket_id: info.ticket_id,
            position: info.position,
            estimated_wait: info.estimated_wait,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub ticket_id: TicketId,
    pub clinic_id: ClinicId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub message: String,
}

impl CancelResponse {
    pub fn for_ticket(ticket_id: &TicketId) -> Self {
        Self {
            message: format!("Ticket {} canceled successfully.", ticket_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl From<&QueueError> for ErrorResponse {
    fn from(err: &QueueError) -> Self {
        let detail = if err.is_not_found() {
            "Ticket ID not found".to_string()
        } else {
            err.to_string()
        };
        Self { detail }
    }
}
