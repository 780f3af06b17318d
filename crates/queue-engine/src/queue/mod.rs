//! # Clinic Queue Engine
//!
//! Per-clinic visit queues with emergency pre-emption.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               QueueEngine                │
//! │   join / get_position / cancel / stats   │
//! └───────────────┬──────────────────────────┘
//!                 │
//! ┌───────────────▼──────────────────────────┐
//! │  ClinicRegistry (DashMap, get-or-create) │
//! └──────┬───────────────────┬───────────────┘
//!        │                   │
//! ┌──────▼───────┐    ┌──────▼───────┐
//! │ ClinicQueue  │    │ ClinicQueue  │   one Mutex per clinic
//! │  "C1"        │    │  "C2"        │
//! └──────────────┘    └──────────────┘
//! ```
//!
//! Queue policy:
//!
//! - Non-emergency tickets join at the tail (FIFO among themselves).
//! - Emergency tickets join ahead of every non-emergency ticket, at
//!   position 1 by default (see [`EmergencyPlacement`]).
//! - Cancelling a ticket moves everyone behind it up one position.
//! - Estimated wait is `position × wait_unit_minutes`.
//!
//! [`EmergencyPlacement`]: crate::config::EmergencyPlacement

pub mod clinic;
pub mod engine;
pub mod estimator;
pub mod registry;
pub mod types;

pub use clinic::ClinicQueue;
pub use engine::QueueEngine;
pub use estimator::{estimated_wait, WaitEstimator, WAIT_UNIT_MINUTES};
pub use registry::ClinicRegistry;
pub use types::{ClinicId, JoinOutcome, PositionInfo, QueueStats, Ticket, TicketId};
