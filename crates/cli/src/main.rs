//! Line-oriented driver for the clinic queue engine.
//!
//! Reads commands from stdin (or `--script`) and prints one JSON response
//! per command:
//!
//! ```text
//! join C1 Thandi
//! join --emergency C1 Sipho
//! join C1 Mary Ann
//! list C1
//! stats
//! ```

mod commands;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use healthassist_queue_engine::logging::{parse_log_level, setup_logging, LogFormat, LoggingConfig};
use healthassist_queue_engine::{EmergencyPlacement, EngineConfig, QueueEngine, VERSION};

#[derive(Debug, Parser)]
#[command(name = "healthassist-queue", version, about = "Clinic visit-queue engine driver")]
struct Args {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "HEALTHASSIST_QUEUE_CONFIG")]
    config: Option<PathBuf>,

    /// Minutes of estimated wait per queue position
    #[arg(long)]
    wait_unit: Option<u32>,

    /// Emergency placement: `front` or `after-last-emergency`
    #[arg(long)]
    emergency_placement: Option<EmergencyPlacement>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log format: `text` or `json`
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Read commands from a file instead of stdin
    #[arg(long, short = 's')]
    script: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config =
        EngineConfig::load(args.config.as_deref()).context("failed to load engine configuration")?;
    if let Some(minutes) = args.wait_unit {
        config = config.with_wait_unit(minutes);
    }
    if let Some(placement) = args.emergency_placement {
        config = config.with_emergency_placement(placement);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let logging = LoggingConfig::new(parse_log_level(&args.log_level)?).with_format(args.log_format);
    setup_logging(&logging)?;
    info!("Starting healthassist-queue v{}", VERSION);

    let engine = QueueEngine::new(build_config(&args)?);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (number, line) in input.lines().enumerate() {
        let line = line.context("failed to read input")?;
        match commands::parse_line(&line) {
            Ok(Some(command)) => {
                let response = commands::execute(&engine, &command);
                writeln!(out, "{}", serde_json::to_string(&response)?)?;
            }
            Ok(None) => {}
            Err(message) => {
                warn!(line = number + 1, "unrecognized command");
                writeln!(out, "{}", serde_json::json!({ "detail": message }))?;
            }
        }
    }

    info!(total_tickets = engine.total_tickets(), "input exhausted");
    Ok(())
}
