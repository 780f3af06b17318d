//! Ticket and clinic value types returned by the queue engine

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a clinic queue. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClinicId(pub String);

impl ClinicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClinicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClinicId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ClinicId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Globally unique ticket identifier, generated on join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl TicketId {
    /// Random v4 UUID, unguessable and unique for the process lifetime.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TicketId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A patient's entry in one clinic's queue.
///
/// Only `position` ever changes after creation, and only the owning clinic
/// queue changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub clinic_id: ClinicId,
    /// Display label, not a key
    pub user_name: String,
    /// 1-based rank within the clinic; lower is sooner
    pub position: u32,
    pub is_emergency: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of joining a clinic queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub ticket_id: TicketId,
    pub position: u32,
    /// Minutes
    pub estimated_wait: u32,
}

/// Current standing of a live ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub ticket_id: TicketId,
    pub position: u32,
    /// Minutes
    pub estimated_wait: u32,
}

/// Point-in-time statistics for one clinic queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub clinic_id: ClinicId,
    pub total_tickets: usize,
    pub emergency_tickets: usize,
    /// Seconds since the oldest live ticket joined, 0 when empty
    pub longest_wait_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ticket_ids_are_unique() {
        let a = TicketId::generate();
        let b = TicketId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = ClinicId::from("C1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"C1\"");
        let back: TicketId = serde_json::from_str("\"t-1\"").unwrap();
        assert_eq!(back, TicketId::from("t-1"));
    }
}
