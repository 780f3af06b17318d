//! Queue commands accepted by the driver, one per input line

use clap::{Parser, Subcommand};
use serde_json::Value;

use healthassist_queue_engine::api::{CancelResponse, ErrorResponse, QueueResponse};
use healthassist_queue_engine::{ClinicId, QueueEngine, TicketId};

/// A single input line, parsed with the same derive machinery as the
/// process arguments.
#[derive(Debug, Parser)]
#[command(name = "queue", no_binary_name = true, disable_help_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: QueueCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum QueueCommand {
    /// Join a clinic queue: `join [--emergency] <clinic> <name...>`
    Join {
        #[arg(long, short = 'e')]
        emergency: bool,
        clinic_id: String,
        /// Display name (rest of the line, may contain spaces or start with `-`)
        #[arg(
            trailing_var_arg = true,
            allow_hyphen_values = true,
            num_args = 1..,
            required = true
        )]
        user_name: Vec<String>,
    },
    /// Show a ticket's position and estimated wait
    Position { clinic_id: String, ticket_id: String },
    /// Cancel a ticket
    Cancel { clinic_id: String, ticket_id: String },
    /// List a clinic's tickets in queue order
    List { clinic_id: String },
    /// Queue statistics for one clinic, or all clinics
    Stats { clinic_id: Option<String> },
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<QueueCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    CommandLine::try_parse_from(line.split_whitespace())
        .map(|parsed| Some(parsed.command))
        .map_err(|e| e.render().to_string().trim().to_string())
}

impl QueueCommand {
    /// Join a name's tokens with single spaces. A name wrapped in matching
    /// double quotes is unwrapped.
    pub fn display_name(parts: &[String]) -> String {
        let joined = parts.join(" ");
        match joined.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
            Some(inner) if !inner.is_empty() => inner.to_string(),
            _ => joined,
        }
    }
}

/// Run a command against the engine and render the JSON response.
///
/// Engine errors become an [`ErrorResponse`]; they never stop the driver.
pub fn execute(engine: &QueueEngine, command: &QueueCommand) -> Value {
    let result = match command {
        QueueCommand::Join {
            emergency,
            clinic_id,
            user_name,
        } => {
            let user_name = QueueCommand::display_name(user_name);
            let outcome = engine.join(&ClinicId::from(clinic_id.as_str()), &user_name, *emergency);
            Ok(to_value(&QueueResponse::from(outcome)))
        }
        QueueCommand::Position {
            clinic_id,
            ticket_id,
        } => engine
            .get_position(
                &ClinicId::from(clinic_id.as_str()),
                &TicketId::from(ticket_id.as_str()),
            )
            .map(|info| to_value(&QueueResponse::from(info))),
        QueueCommand::Cancel {
            clinic_id,
            ticket_id,
        } => {
            let ticket_id = TicketId::from(ticket_id.as_str());
            engine
                .cancel(&ClinicId::from(clinic_id.as_str()), &ticket_id)
                .map(|()| to_value(&CancelResponse::for_ticket(&ticket_id)))
        }
        QueueCommand::List { clinic_id } => engine
            .snapshot(&ClinicId::from(clinic_id.as_str()))
            .map(|tickets| to_value(&tickets)),
        QueueCommand::Stats { clinic_id: Some(clinic_id) } => engine
            .queue_stats(&ClinicId::from(clinic_id.as_str()))
            .map(|stats| to_value(&stats)),
        QueueCommand::Stats { clinic_id: None } => Ok(to_value(&engine.all_queue_stats())),
    };

    result.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "command failed");
        to_value(&ErrorResponse::from(&err))
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
