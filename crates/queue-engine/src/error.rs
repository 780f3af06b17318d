//! Error types for queue engine operations

use thiserror::Error;

/// Result type alias for queue engine operations
pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The `(clinic_id, ticket_id)` pair does not name a live ticket.
    ///
    /// Raised when the clinic was never referenced, the ticket was already
    /// cancelled, or the id never existed. Not transient.
    #[error("Ticket ID not found: {ticket_id} in clinic {clinic_id}")]
    NotFound { clinic_id: String, ticket_id: String },

    /// Lookup of a clinic that has never been referenced.
    #[error("Clinic not found: {clinic_id}")]
    ClinicNotFound { clinic_id: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QueueError {
    pub fn not_found(clinic_id: impl Into<String>, ticket_id: impl Into<String>) -> Self {
        Self::NotFound {
            clinic_id: clinic_id.into(),
            ticket_id: ticket_id.into(),
        }
    }

    pub fn clinic_not_found(clinic_id: impl Into<String>) -> Self {
        Self::ClinicNotFound {
            clinic_id: clinic_id.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Both lookup misses map to the single "not found" condition the
    /// service layer surfaces.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ClinicNotFound { .. })
    }
}

impl From<::config::ConfigError> for QueueError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for QueueError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
