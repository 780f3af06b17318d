//! # HealthAssist Queue Engine
//!
//! In-process visit-queue manager for clinics. Patients join a clinic's
//! queue and receive a ticket with a 1-based position and an estimated
//! wait; emergency tickets pre-empt the queue; cancelled tickets leave no
//! gap behind them.
//!
//! The engine is safe to share between request handlers as
//! `Arc<QueueEngine>`. Each clinic is locked independently, so traffic for
//! one clinic never blocks another.
//!
//! ## Quick Start
//!
//! ```rust
//! use healthassist_queue_engine::prelude::*;
//!
//! let engine = QueueEngine::new(EngineConfig::default());
//! let clinic = ClinicId::from("soweto");
//!
//! let ticket = engine.join(&clinic, "Thandi", false);
//! let info = engine.get_position(&clinic, &ticket.ticket_id)?;
//! assert_eq!(info.estimated_wait, 25);
//! # Ok::<(), QueueError>(())
//! ```
//!
//! ## Modules
//!
//! - [`queue`]: engine, clinic registry, clinic queues, wait estimator
//! - [`config`]: engine configuration and loading
//! - [`api`]: serializable request/response shapes for a service layer
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: error type

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod queue;

pub use crate::config::{EmergencyPlacement, EngineConfig, DEFAULT_WAIT_UNIT_MINUTES};
pub use crate::error::{QueueError, Result};
pub use crate::queue::{
    ClinicId, ClinicQueue, ClinicRegistry, JoinOutcome, PositionInfo, QueueEngine, QueueStats,
    Ticket, TicketId, WaitEstimator,
};

/// Version of the queue engine crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use crate::api::{CancelRequest, CancelResponse, ErrorResponse, JoinRequest, QueueResponse};
    pub use crate::config::{EmergencyPlacement, EngineConfig};
    pub use crate::error::{QueueError, Result};
    pub use crate::queue::{
        ClinicId, JoinOutcome, PositionInfo, QueueEngine, QueueStats, Ticket, TicketId,
    };
}
