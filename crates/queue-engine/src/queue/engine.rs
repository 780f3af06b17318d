//! # Queue Engine
//!
//! The single entry point a service layer calls into. The engine owns the
//! [`ClinicRegistry`] and the wait estimator; callers only ever receive
//! copies of ticket data.
//!
//! ## Concurrency
//!
//! - Operations on one clinic are serialized by that clinic's lock, so for a
//!   fixed clinic every concurrent history of joins and cancels is
//!   equivalent to some serial order.
//! - Operations on different clinics never wait on each other. The registry
//!   map is only touched to look up or create a handle.
//!
//! ## Example
//!
//! ```rust
//! use healthassist_queue_engine::prelude::*;
//!
//! let engine = QueueEngine::default();
//! let clinic = ClinicId::from("C1");
//!
//! let a = engine.join(&clinic, "A", false);
//! assert_eq!((a.position, a.estimated_wait), (1, 25));
//!
//! let c = engine.join(&clinic, "C", true);
//! assert_eq!(c.position, 1);
//! assert_eq!(engine.get_position(&clinic, &a.ticket_id)?.position, 2);
//!
//! engine.cancel(&clinic, &a.ticket_id)?;
//! assert!(engine.get_position(&clinic, &a.ticket_id).is_err());
//! # Ok::<(), QueueError>(())
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{QueueError, Result};

use super::clinic::ClinicQueue;
use super::estimator::WaitEstimator;
use super::registry::ClinicRegistry;
use super::types::{ClinicId, JoinOutcome, PositionInfo, QueueStats, Ticket, TicketId};

pub struct QueueEngine {
    config: EngineConfig,
    estimator: WaitEstimator,
    registry: ClinicRegistry,
}

impl QueueEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            wait_unit_minutes = config.wait_unit_minutes,
            emergency_placement = ?config.emergency_placement,
            "Queue engine initialized"
        );
        Self {
            estimator: WaitEstimator::new(config.wait_unit_minutes),
            config,
            registry: ClinicRegistry::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ClinicRegistry {
        &self.registry
    }

    pub fn estimated_wait(&self, position: u32) -> u32 {
        self.estimator.estimate(position)
    }

    /// Admit a patient to a clinic's queue. Never fails.
    pub fn join(&self, clinic_id: &ClinicId, user_name: &str, is_emergency: bool) -> JoinOutcome {
        let queue = self.registry.get_or_create(clinic_id);
        let ticket = queue.join(user_name, is_emergency, self.config.emergency_placement);

        info!(
            clinic_id = %clinic_id,
            ticket_id = %ticket.ticket_id,
            position = ticket.position,
            is_emergency,
            "Ticket joined queue"
        );

        JoinOutcome {
            estimated_wait: self.estimator.estimate(ticket.position),
            position: ticket.position,
            ticket_id: ticket.ticket_id,
        }
    }

    /// Current position and estimated wait of a live ticket.
    pub fn get_position(&self, clinic_id: &ClinicId, ticket_id: &TicketId) -> Result<PositionInfo> {
        let queue = self.lookup(clinic_id, ticket_id)?;
        let position = queue.position(ticket_id).map_err(|e| {
            warn!(clinic_id = %clinic_id, ticket_id = %ticket_id, "Ticket not found");
            e
        })?;

        debug!(clinic_id = %clinic_id, ticket_id = %ticket_id, position, "Position lookup");
        Ok(PositionInfo {
            ticket_id: ticket_id.clone(),
            position,
            estimated_wait: self.estimator.estimate(position),
        })
    }

    /// Remove a ticket; tickets behind it move up one position.
    pub fn cancel(&self, clinic_id: &ClinicId, ticket_id: &TicketId) -> Result<()> {
        let queue = self.lookup(clinic_id, ticket_id)?;
        let removed = queue.cancel(ticket_id).map_err(|e| {
            warn!(clinic_id = %clinic_id, ticket_id = %ticket_id, "Cancel of unknown ticket");
            e
        })?;

        info!(
            clinic_id = %clinic_id,
            ticket_id = %ticket_id,
            vacated_position = removed.position,
            remaining = queue.len(),
            "Ticket cancelled"
        );
        Ok(())
    }

    /// Copy of a live ticket with all its attributes.
    pub fn ticket(&self, clinic_id: &ClinicId, ticket_id: &TicketId) -> Result<Ticket> {
        self.lookup(clinic_id, ticket_id)?.ticket(ticket_id)
    }

    /// All live tickets of a clinic ordered by position.
    pub fn snapshot(&self, clinic_id: &ClinicId) -> Result<Vec<Ticket>> {
        self.clinic(clinic_id).map(|queue| queue.snapshot())
    }

    pub fn queue_stats(&self, clinic_id: &ClinicId) -> Result<QueueStats> {
        self.clinic(clinic_id).map(|queue| queue.stats())
    }

    /// Statistics for every known clinic, sorted by clinic id.
    pub fn all_queue_stats(&self) -> Vec<QueueStats> {
        self.registry.queues().iter().map(|queue| queue.stats()).collect()
    }

    /// Live tickets across all clinics.
    pub fn total_tickets(&self) -> usize {
        self.registry.queues().iter().map(|queue| queue.len()).sum()
    }

    fn clinic(&self, clinic_id: &ClinicId) -> Result<Arc<ClinicQueue>> {
        self.registry
            .get(clinic_id)
            .ok_or_else(|| QueueError::clinic_not_found(clinic_id.as_str()))
    }

    /// Unknown clinics report the ticket as not found.
    fn lookup(&self, clinic_id: &ClinicId, ticket_id: &TicketId) -> Result<Arc<ClinicQueue>> {
        self.registry.get(clinic_id).ok_or_else(|| {
            warn!(clinic_id = %clinic_id, ticket_id = %ticket_id, "Lookup in unknown clinic");
            QueueError::not_found(clinic_id.as_str(), ticket_id.as_str())
        })
    }
}

impl Default for QueueEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmergencyPlacement;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_scenario() {
        let engine = QueueEngine::default();
        let c1 = ClinicId::from("C1");

        let a = engine.join(&c1, "A", false);
        assert_eq!((a.position, a.estimated_wait), (1, 25));
        let b = engine.join(&c1, "B", false);
        assert_eq!((b.position, b.estimated_wait), (2, 50));
        let c = engine.join(&c1, "C", true);
        assert_eq!((c.position, c.estimated_wait), (1, 25));

        let pa = engine.get_position(&c1, &a.ticket_id).unwrap();
        assert_eq!((pa.position, pa.estimated_wait), (2, 50));
        let pb = engine.get_position(&c1, &b.ticket_id).unwrap();
        assert_eq!((pb.position, pb.estimated_wait), (3, 75));

        engine.cancel(&c1, &a.ticket_id).unwrap();
        assert_eq!(engine.get_position(&c1, &c.ticket_id).unwrap().position, 1);
        let pb = engine.get_position(&c1, &b.ticket_id).unwrap();
        assert_eq!((pb.position, pb.estimated_wait), (2, 50));

        let err = engine.get_position(&c1, &a.ticket_id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unknown_clinic_is_not_found() {
        let engine = QueueEngine::default();
        let clinic = ClinicId::from("nowhere");
        let ticket = TicketId::from("t");

        assert_eq!(
            engine.get_position(&clinic, &ticket).unwrap_err(),
            QueueError::not_found("nowhere", "t")
        );
        assert!(engine.cancel(&clinic, &ticket).unwrap_err().is_not_found());
        assert!(engine.snapshot(&clinic).unwrap_err().is_not_found());
        // Lookups must not create the clinic
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_configured_wait_unit() {
        let engine = QueueEngine::new(EngineConfig::default().with_wait_unit(10));
        let clinic = ClinicId::from("C1");
        engine.join(&clinic, "A", false);
        let b = engine.join(&clinic, "B", false);
        assert_eq!(b.estimated_wait, 20);
    }

    #[test]
    fn test_after_last_emergency_policy() {
        let engine = QueueEngine::new(
            EngineConfig::default().with_emergency_placement(EmergencyPlacement::AfterLastEmergency),
        );
        let clinic = ClinicId::from("C1");
        let a = engine.join(&clinic, "A", false);
        let e1 = engine.join(&clinic, "E1", true);
        let e2 = engine.join(&clinic, "E2", true);

        assert_eq!(engine.get_position(&clinic, &e1.ticket_id).unwrap().position, 1);
        assert_eq!(engine.get_position(&clinic, &e2.ticket_id).unwrap().position, 2);
        assert_eq!(engine.get_position(&clinic, &a.ticket_id).unwrap().position, 3);
    }

    #[test]
    fn test_stats_and_totals() {
        let engine = QueueEngine::default();
        engine.join(&ClinicId::from("C2"), "X", true);
        engine.join(&ClinicId::from("C1"), "A", false);
        engine.join(&ClinicId::from("C1"), "B", false);

        let stats = engine.all_queue_stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].clinic_id, ClinicId::from("C1"));
        assert_eq!(stats[0].total_tickets, 2);
        assert_eq!(stats[1].emergency_tickets, 1);
        assert_eq!(engine.total_tickets(), 3);
    }

    #[test]
    fn test_ticket_copy_is_detached() {
        let engine = QueueEngine::default();
        let clinic = ClinicId::from("C1");
        let a = engine.join(&clinic, "A", false);
        let before = engine.ticket(&clinic, &a.ticket_id).unwrap();
        engine.join(&clinic, "E", true);

        assert_eq!(before.position, 1);
        let after = engine.ticket(&clinic, &a.ticket_id).unwrap();
        assert_eq!(after.position, 2);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.user_name, "A");
    }
}
