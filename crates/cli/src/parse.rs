//! ArgMatches → CliAction conversion.
//!
//! Field parsers are shared with the interactive menu so both front ends
//! reject the same malformed input with the same message.

use chrono::NaiveDate;
use clap::ArgMatches;
use tablebook_core::{parse_date, ReservationId, SlotTime};

/// The result of parsing user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Book a table.
    Reserve {
        name: String,
        party: u32,
        date: NaiveDate,
        time: SlotTime,
    },
    /// Report free slots on a date.
    Slots { date: NaiveDate },
    /// Show a reservation's date and time.
    Show { id: ReservationId },
    /// Cancel a reservation.
    Cancel { id: ReservationId },
    /// Run the interactive menu.
    Menu,
}

/// Convert clap matches into an action.
///
/// No subcommand means the interactive menu.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    match matches.subcommand() {
        Some(("reserve", sub)) => Ok(CliAction::Reserve {
            name: required(sub, "name")?.to_string(),
            party: parse_party(required(sub, "party")?)?,
            date: parse_day(required(sub, "date")?)?,
            time: parse_time(required(sub, "time")?)?,
        }),
        Some(("slots", sub)) => Ok(CliAction::Slots {
            date: parse_day(required(sub, "date")?)?,
        }),
        Some(("show", sub)) => Ok(CliAction::Show {
            id: parse_id(required(sub, "id")?)?,
        }),
        Some(("cancel", sub)) => Ok(CliAction::Cancel {
            id: parse_id(required(sub, "id")?)?,
        }),
        Some(("menu", _)) | None => Ok(CliAction::Menu),
        Some((other, _)) => Err(format!("Unknown command: {}", other)),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, String> {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("Missing --{}", name))
}

/// Parse a party size: a positive whole number.
pub fn parse_party(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(format!(
            "Invalid party size '{}': expected a positive number",
            raw.trim()
        )),
        Ok(n) => Ok(n),
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).map_err(|e| e.to_string())
}

/// Parse an `HH:MM` time.
pub fn parse_time(raw: &str) -> Result<SlotTime, String> {
    raw.parse().map_err(|e: tablebook_core::Error| e.to_string())
}

/// Parse a reservation id.
pub fn parse_id(raw: &str) -> Result<ReservationId, String> {
    raw.trim()
        .parse::<u64>()
        .map(ReservationId)
        .map_err(|_| format!("Invalid reservation ID '{}'", raw.trim()))
}
