//! # Queue Engine Configuration
//!
//! Configuration for the queue engine: the wait-time unit used by the
//! estimator and the emergency placement policy.
//!
//! Configuration is layered the same way for every deployment:
//!
//! 1. Built-in defaults ([`EngineConfig::default`])
//! 2. An optional TOML file
//! 3. `HEALTHASSIST_QUEUE__*` environment variables
//!
//! ```toml
//! wait_unit_minutes = 25
//! emergency_placement = "front"
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{QueueError, Result};

/// Minutes of estimated wait per queue position in the reference policy.
pub const DEFAULT_WAIT_UNIT_MINUTES: u32 = 25;

/// Prefix for environment overrides, e.g. `HEALTHASSIST_QUEUE__WAIT_UNIT_MINUTES=30`.
pub const ENV_PREFIX: &str = "HEALTHASSIST_QUEUE";

/// Where a newly joined emergency ticket is placed.
///
/// Either way every emergency ranks ahead of every non-emergency ticket.
/// Accepts `after_last_emergency` or `after-last-emergency` wherever it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyPlacement {
    /// Position 1. The latest emergency is first in line, so emergencies
    /// are served in reverse arrival order.
    #[default]
    Front,
    /// Directly behind the emergencies already waiting. Emergencies are
    /// served in arrival order.
    AfterLastEmergency,
}

impl std::str::FromStr for EmergencyPlacement {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "front" => Ok(Self::Front),
            "after_last_emergency" => Ok(Self::AfterLastEmergency),
            other => Err(QueueError::config(format!(
                "Invalid emergency placement: {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for EmergencyPlacement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minutes of estimated wait per queue position
    pub wait_unit_minutes: u32,
    /// Emergency insertion policy
    pub emergency_placement: EmergencyPlacement,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wait_unit_minutes: DEFAULT_WAIT_UNIT_MINUTES,
            emergency_placement: EmergencyPlacement::Front,
        }
    }
}

impl EngineConfig {
    pub fn with_wait_unit(mut self, minutes: u32) -> Self {
        self.wait_unit_minutes = minutes;
        self
    }

    pub fn with_emergency_placement(mut self, placement: EmergencyPlacement) -> Self {
        self.emergency_placement = placement;
        self
    }

    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            QueueError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Layer defaults, an optional TOML file and environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = ::config::Config::builder()
            .set_default("wait_unit_minutes", i64::from(defaults.wait_unit_minutes))?
            .set_default("emergency_placement", "front")?;

        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.wait_unit_minutes == 0 {
            return Err(QueueError::config("wait_unit_minutes must be greater than zero"));
        }
        Ok(())
    }
}
