//! Logging setup for binaries and services embedding the queue engine
//!
//! Queue events are emitted at the requested level while dependency crates
//! stay at `warn`. `RUST_LOG`, when set, replaces the computed filter.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{QueueError, Result};

/// Targets that log at the requested level.
const QUEUE_TARGETS: [&str; 2] = ["healthassist_queue_engine", "healthassist_queue"];

/// Output format of the log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(QueueError::config(format!("Invalid log format: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Include file and line of each event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Text,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_source_location(mut self) -> Self {
        self.source_location = true;
        self
    }

    /// Filter directives used when `RUST_LOG` is unset.
    pub fn directives(&self) -> String {
        let level = self.level.as_str().to_ascii_lowercase();
        let mut directives = String::from("warn");
        for target in QUEUE_TARGETS {
            directives.push_str(&format!(",{}={}", target, level));
        }
        directives
    }

    fn filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(self.directives())
                .map_err(|e| QueueError::config(format!("Invalid log filter: {}", e))),
        }
    }
}

/// Install the global `tracing` subscriber, writing to stderr so stdout
/// carries only command output.
///
/// Fails with [`QueueError::Config`] if a global subscriber is already set.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(config.filter()?)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| QueueError::config(format!("Failed to install logger: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level).map_err(|_| QueueError::config(format!("Invalid log level: {}", level)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("WARN").unwrap(), Level::WARN);
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_directives_keep_dependencies_at_warn() {
        let config = LoggingConfig::new(Level::TRACE);
        assert_eq!(
            config.directives(),
            "warn,healthassist_queue_engine=trace,healthassist_queue=trace"
        );
        assert!(EnvFilter::try_new(config.directives()).is_ok());
    }

    #[test]
    #[serial_test::serial]
    fn test_second_install_is_config_error() {
        // The only test in this binary that installs a global subscriber
        let config = LoggingConfig::new(Level::DEBUG).with_source_location();
        setup_logging(&config).unwrap();
        let err = setup_logging(&LoggingConfig::default()).unwrap_err();
        assert!(matches!(err, QueueError::Config(_)));
    }
}
