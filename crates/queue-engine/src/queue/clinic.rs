//! # Clinic Queue
//!
//! A single clinic's ordered set of live tickets. All state sits behind one
//! [`parking_lot::Mutex`], so every operation is one short critical section
//! and the bulk position shifts of a join or cancel are never observable
//! half-done.
//!
//! Positions are kept dense: the live tickets always occupy exactly
//! `1..=N`. Emergency tickets always form a prefix of the order, ahead of
//! every non-emergency ticket.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;

use crate::config::EmergencyPlacement;
use crate::error::{QueueError, Result};

use super::types::{ClinicId, QueueStats, Ticket, TicketId};

/// 1-based position for a 0-based index into the order.
fn rank(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

#[derive(Debug, Default)]
struct ClinicState {
    /// Live ticket ids in position order; `order[i]` holds position `i + 1`
    order: Vec<TicketId>,
    tickets: HashMap<TicketId, Ticket>,
    emergency_count: usize,
}

impl ClinicState {
    /// Rewrite stored positions for every ticket at or after `from`.
    fn renumber_from(&mut self, from: usize) {
        for (index, id) in self.order.iter().enumerate().skip(from) {
            if let Some(ticket) = self.tickets.get_mut(id) {
                ticket.position = rank(index);
            }
        }
    }

    fn insertion_index(&self, is_emergency: bool, placement: EmergencyPlacement) -> usize {
        match (is_emergency, placement) {
            (false, _) => self.order.len(),
            (true, EmergencyPlacement::Front) => 0,
            (true, EmergencyPlacement::AfterLastEmergency) => self.emergency_count,
        }
    }
}

/// One clinic's queue. Shared between callers as `Arc<ClinicQueue>`.
#[derive(Debug)]
pub struct ClinicQueue {
    clinic_id: ClinicId,
    state: Mutex<ClinicState>,
}

impl ClinicQueue {
    pub fn new(clinic_id: ClinicId) -> Self {
        Self {
            clinic_id,
            state: Mutex::new(ClinicState::default()),
        }
    }

    pub fn clinic_id(&self) -> &ClinicId {
        &self.clinic_id
    }

    /// Admit a new ticket and return a copy of it.
    ///
    /// Non-emergency tickets go to the tail. Emergency tickets go where
    /// `placement` says, and every ticket from that point on moves back one
    /// position.
    pub fn join(
        &self,
        user_name: impl Into<String>,
        is_emergency: bool,
        placement: EmergencyPlacement,
    ) -> Ticket {
        let ticket_id = TicketId::generate();
        let mut state = self.state.lock();

        let index = state.insertion_index(is_emergency, placement);
        let ticket = Ticket {
            ticket_id: ticket_id.clone(),
            clinic_id: self.clinic_id.clone(),
            user_name: user_name.into(),
            position: rank(index),
            is_emergency,
            created_at: Utc::now(),
        };

        state.order.insert(index, ticket_id.clone());
        state.tickets.insert(ticket_id, ticket.clone());
        if is_emergency {
            state.emergency_count += 1;
        }
        state.renumber_from(index + 1);

        ticket
    }

    /// Current position of a live ticket.
    pub fn position(&self, ticket_id: &TicketId) -> Result<u32> {
        self.state
            .lock()
            .tickets
            .get(ticket_id)
            .map(|ticket| ticket.position)
            .ok_or_else(|| QueueError::not_found(self.clinic_id.as_str(), ticket_id.as_str()))
    }

    /// Copy of a live ticket.
    pub fn ticket(&self, ticket_id: &TicketId) -> Result<Ticket> {
        self.state
            .lock()
            .tickets
            .get(ticket_id)
            .cloned()
            .ok_or_else(|| QueueError::not_found(self.clinic_id.as_str(), ticket_id.as_str()))
    }

    /// Remove a live ticket and close the gap it leaves.
    ///
    /// Tickets behind it move up one position; tickets ahead of it keep
    /// theirs. On failure nothing changes.
    pub fn cancel(&self, ticket_id: &TicketId) -> Result<Ticket> {
        let mut state = self.state.lock();

        let removed = state
            .tickets
            .remove(ticket_id)
            .ok_or_else(|| QueueError::not_found(self.clinic_id.as_str(), ticket_id.as_str()))?;

        let index = removed.position as usize - 1;
        debug_assert_eq!(state.order.get(index), Some(ticket_id));
        state.order.remove(index);
        if removed.is_emergency {
            state.emergency_count -= 1;
        }
        state.renumber_from(index);

        Ok(removed)
    }

    /// All live tickets ordered by position.
    pub fn snapshot(&self) -> Vec<Ticket> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .filter_map(|id| state.tickets.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        let now = Utc::now();
        let longest_wait_seconds = state
            .tickets
            .values()
            .map(|ticket| now.signed_duration_since(ticket.created_at).num_seconds())
            .max()
            .unwrap_or(0)
            .max(0) as u64;

        QueueStats {
            clinic_id: self.clinic_id.clone(),
            total_tickets: state.order.len(),
            emergency_tickets: state.emergency_count,
            longest_wait_seconds,
        }
    }

    /// Verify density, index consistency and emergency-prefix ordering.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let state = self.state.lock();

        if state.order.len() != state.tickets.len() {
            return Err(format!(
                "order has {} entries but {} tickets are stored",
                state.order.len(),
                state.tickets.len()
            ));
        }

        let mut seen_regular = false;
        let mut emergencies = 0;
        for (index, id) in state.order.iter().enumerate() {
            let ticket = state
                .tickets
                .get(id)
                .ok_or_else(|| format!("ticket {} in order but not stored", id))?;
            if ticket.position != rank(index) {
                return Err(format!(
                    "ticket {} has position {} at index {}",
                    id, ticket.position, index
                ));
            }
            if ticket.is_emergency {
                if seen_regular {
                    return Err(format!("emergency ticket {} behind a regular ticket", id));
                }
                emergencies += 1;
            } else {
                seen_regular = true;
            }
        }

        if emergencies != state.emergency_count {
            return Err(format!(
                "emergency count {} but {} emergencies queued",
                state.emergency_count, emergencies
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(queue: &ClinicQueue) -> Vec<(String, u32)> {
        queue
            .snapshot()
            .into_iter()
            .map(|t| (t.user_name, t.position))
            .collect()
    }

    #[test]
    fn test_regular_tickets_append() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        let a = queue.join("A", false, EmergencyPlacement::Front);
        let b = queue.join("B", false, EmergencyPlacement::Front);
        assert_eq!(a.position, 1);
        assert_eq!(b.position, 2);
        assert_eq!(b.clinic_id, ClinicId::from("C1"));
        assert!(queue.check_invariants().is_ok());
    }

    #[test]
    fn test_emergency_front_shifts_everyone() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        queue.join("A", false, EmergencyPlacement::Front);
        queue.join("B", false, EmergencyPlacement::Front);
        let c = queue.join("C", true, EmergencyPlacement::Front);
        let d = queue.join("D", true, EmergencyPlacement::Front);

        assert_eq!(c.position, 1);
        assert_eq!(d.position, 1);
        assert_eq!(
            positions(&queue),
            vec![
                ("D".to_string(), 1),
                ("C".to_string(), 2),
                ("A".to_string(), 3),
                ("B".to_string(), 4)
            ]
        );
        assert!(queue.check_invariants().is_ok());
    }

    #[test]
    fn test_emergency_after_last_keeps_arrival_order() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        queue.join("A", false, EmergencyPlacement::AfterLastEmergency);
        let c = queue.join("C", true, EmergencyPlacement::AfterLastEmergency);
        let d = queue.join("D", true, EmergencyPlacement::AfterLastEmergency);

        assert_eq!(c.position, 1);
        assert_eq!(d.position, 2);
        assert_eq!(
            positions(&queue),
            vec![("C".to_string(), 1), ("D".to_string(), 2), ("A".to_string(), 3)]
        );
        assert!(queue.check_invariants().is_ok());
    }

    #[test]
    fn test_cancel_closes_gap() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        queue.join("A", false, EmergencyPlacement::Front);
        let b = queue.join("B", false, EmergencyPlacement::Front);
        queue.join("C", false, EmergencyPlacement::Front);

        let removed = queue.cancel(&b.ticket_id).unwrap();
        assert_eq!(removed.user_name, "B");
        assert_eq!(positions(&queue), vec![("A".to_string(), 1), ("C".to_string(), 2)]);
        assert!(queue.position(&b.ticket_id).unwrap_err().is_not_found());
        assert!(queue.cancel(&b.ticket_id).is_err());
        assert!(queue.check_invariants().is_ok());
    }

    #[test]
    fn test_cancel_emergency_updates_count() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        queue.join("A", false, EmergencyPlacement::Front);
        let e = queue.join("E", true, EmergencyPlacement::Front);
        assert_eq!(queue.stats().emergency_tickets, 1);

        queue.cancel(&e.ticket_id).unwrap();
        let stats = queue.stats();
        assert_eq!(stats.emergency_tickets, 0);
        assert_eq!(stats.total_tickets, 1);
        assert!(queue.check_invariants().is_ok());
    }

    #[test]
    fn test_unknown_ticket() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        let err = queue.position(&TicketId::from("missing")).unwrap_err();
        assert_eq!(err, QueueError::not_found("C1", "missing"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stats_on_empty_queue() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        let stats = queue.stats();
        assert_eq!(stats.total_tickets, 0);
        assert_eq!(stats.longest_wait_seconds, 0);
    }

    #[test]
    fn test_stats_longest_wait_tracks_oldest_ticket() {
        let queue = ClinicQueue::new(ClinicId::from("C1"));
        let old = queue.join("Old", false, EmergencyPlacement::Front);
        let new = queue.join("New", true, EmergencyPlacement::Front);
        {
            let mut state = queue.state.lock();
            if let Some(ticket) = state.tickets.get_mut(&old.ticket_id) {
                ticket.created_at = Utc::now() - chrono::Duration::seconds(90);
            }
        }

        let stats = queue.stats();
        assert_eq!(stats.total_tickets, 2);
        assert!((90..100).contains(&stats.longest_wait_seconds));

        queue.cancel(&old.ticket_id).unwrap();
        assert!(queue.stats().longest_wait_seconds < 90);
        queue.cancel(&new.ticket_id).unwrap();
        assert_eq!(queue.stats().longest_wait_seconds, 0);
    }
}
