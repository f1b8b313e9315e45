//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): the menu's wording, e.g. `Reservation cancelled successfully.`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use serde_json::json;
use tablebook_core::Reservation;
use tablebook_engine::SlotReport;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Result of one successful operation.
#[derive(Debug)]
pub enum Output {
    Created(Reservation),
    Slots(SlotReport),
    Found(Option<Reservation>),
    Cancelled(bool),
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &dyn std::fmt::Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({ "error": err.to_string() }))
            .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("Error: {}", err),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Created(r) => format!(
            "Reservation created successfully. Reservation ID: {}",
            r.id()
        ),
        Output::Slots(report) => report.to_string().trim_end().to_string(),
        Output::Found(Some(r)) => {
            format!("Reservation Date and Time: {} {}", r.date(), r.time())
        }
        Output::Found(None) => "Reservation not found.".to_string(),
        Output::Cancelled(true) => "Reservation cancelled successfully.".to_string(),
        Output::Cancelled(false) => "Reservation not found or could not be canceled.".to_string(),
    }
}

fn format_json(output: &Output) -> String {
    let value = match output {
        Output::Created(r) | Output::Found(Some(r)) => serde_json::to_value(r),
        Output::Slots(report) => serde_json::to_value(report),
        Output::Found(None) => Ok(serde_json::Value::Null),
        Output::Cancelled(cancelled) => Ok(json!({ "cancelled": cancelled })),
    };
    value
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
