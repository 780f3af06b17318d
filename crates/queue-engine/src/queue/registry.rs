//! Clinic registry: lazily created, process-lifetime clinic queues

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use super::clinic::ClinicQueue;
use super::types::ClinicId;

/// Directory of clinic queues keyed by clinic id.
///
/// Entries are created on first reference and never removed. Handles are
/// cloned out of the map, so the map's shard locks are only held for the
/// lookup itself and never across a queue operation.
#[derive(Debug, Default)]
pub struct ClinicRegistry {
    clinics: DashMap<ClinicId, Arc<ClinicQueue>>,
}

impl ClinicRegistry {
    pub fn new() -> Self {
        Self {
            clinics: DashMap::new(),
        }
    }

    /// Existing queue for `clinic_id`, or a new empty one.
    ///
    /// Concurrent callers racing on a new id all receive the same queue.
    pub fn get_or_create(&self, clinic_id: &ClinicId) -> Arc<ClinicQueue> {
        if let Some(queue) = self.clinics.get(clinic_id) {
            return Arc::clone(queue.value());
        }

        let entry = self.clinics.entry(clinic_id.clone()).or_insert_with(|| {
            info!(clinic_id = %clinic_id, "Creating clinic queue");
            Arc::new(ClinicQueue::new(clinic_id.clone()))
        });
        Arc::clone(entry.value())
    }

    /// Queue for a clinic that has already been referenced.
    pub fn get(&self, clinic_id: &ClinicId) -> Option<Arc<ClinicQueue>> {
        self.clinics.get(clinic_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, clinic_id: &ClinicId) -> bool {
        self.clinics.contains_key(clinic_id)
    }

    /// Known clinic ids, sorted.
    pub fn clinic_ids(&self) -> Vec<ClinicId> {
        let mut ids: Vec<ClinicId> = self.clinics.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Handles for every known clinic, sorted by id.
    pub fn queues(&self) -> Vec<Arc<ClinicQueue>> {
        let mut queues: Vec<Arc<ClinicQueue>> =
            self.clinics.iter().map(|entry| Arc::clone(entry.value())).collect();
        queues.sort_by(|a, b| a.clinic_id().cmp(b.clinic_id()));
        queues
    }

    pub fn len(&self) -> usize {
        self.clinics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clinics.is_empty()
    }
}
