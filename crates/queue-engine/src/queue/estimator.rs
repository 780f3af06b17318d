//! Wait-time estimation from queue position

use crate::config::DEFAULT_WAIT_UNIT_MINUTES;

/// Reference minutes of wait per position.
pub const WAIT_UNIT_MINUTES: u32 = DEFAULT_WAIT_UNIT_MINUTES;

/// Estimated wait in minutes for `position` under the reference unit.
pub fn estimated_wait(position: u32) -> u32 {
    WaitEstimator::default().estimate(position)
}

/// Stateless estimator: `position × unit_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitEstimator {
    unit_minutes: u32,
}

impl WaitEstimator {
    pub fn new(unit_minutes: u32) -> Self {
        Self { unit_minutes }
    }

    pub fn unit_minutes(&self) -> u32 {
        self.unit_minutes
    }

    pub fn estimate(&self, position: u32) -> u32 {
        position.saturating_mul(self.unit_minutes)
    }
}

impl Default for WaitEstimator {
    fn default() -> Self {
        Self::new(WAIT_UNIT_MINUTES)
    }
}
