//! Interactive reservation menu.
//!
//! Reads answers line by line from any `BufRead` and writes prompts to any
//! `Write`, so the loop runs the same over a terminal, a pipe, or a test
//! buffer. End of input behaves like choosing Exit.

use std::io::{self, BufRead, Write};

use tablebook_engine::ReservationService;
use tracing::error;

use crate::format::{format_error, format_output, Output, OutputMode};
use crate::parse::{parse_day, parse_id, parse_party, parse_time};

const MENU: &str = "\n--- Restaurant Reservation System ---
1. Reserve a Table
2. View Available Slots
3. Check Reservation Time
4. Cancel Reservation
5. Exit
";

/// Run the menu until Exit or end of input.
pub fn run_menu<R: BufRead, W: Write>(
    service: &ReservationService,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    loop {
        write!(out, "{}", MENU)?;
        let Some(choice) = prompt(input, out, "Choose an option: ")? else {
            break;
        };
        let result = match choice.as_str() {
            "1" => reserve(service, input, out)?,
            "2" => slots(service, input, out)?,
            "3" => show(service, input, out)?,
            "4" => cancel(service, input, out)?,
            "5" => {
                writeln!(out, "Thank you for using the reservation system.")?;
                break;
            }
            _ => {
                writeln!(out, "Invalid option. Please try again.")?;
                continue;
            }
        };
        match result {
            Some(Ok(output)) => writeln!(out, "{}", format_output(&output, OutputMode::Human))?,
            Some(Err(message)) => writeln!(out, "{}", format_error(&message, OutputMode::Human))?,
            None => break,
        }
    }
    out.flush()
}

/// Outcome of one menu choice; `None` means input ended mid-prompt.
type Step = Option<Result<Output, String>>;

fn reserve<R: BufRead, W: Write>(
    service: &ReservationService,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let Some(name) = prompt(input, out, "Enter Customer Name: ")? else {
        return Ok(None);
    };
    let Some(party) = prompt(input, out, "Enter Party Size: ")? else {
        return Ok(None);
    };
    let Some(date) = prompt(input, out, "Enter Reservation Date (YYYY-MM-DD): ")? else {
        return Ok(None);
    };
    let Some(time) = prompt(input, out, "Enter Reservation Time (HH:MM): ")? else {
        return Ok(None);
    };

    let request = parse_party(&party).and_then(|party| {
        Ok((party, parse_day(&date)?, parse_time(&time)?))
    });
    let step = request.and_then(|(party, date, time)| {
        service
            .create_reservation(&name, party, date, time)
            .map(Output::Created)
            .map_err(|e| {
                if !e.is_business_failure() {
                    error!(error = %e, "Reservation failed");
                }
                e.to_string()
            })
    });
    Ok(Some(step))
}

fn slots<R: BufRead, W: Write>(
    service: &ReservationService,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let Some(date) = prompt(input, out, "Enter Date (YYYY-MM-DD) to check availability: ")? else {
        return Ok(None);
    };
    let step = parse_day(&date).and_then(|date| {
        service
            .available_slots(date)
            .map(Output::Slots)
            .map_err(|e| e.to_string())
    });
    Ok(Some(step))
}

fn show<R: BufRead, W: Write>(
    service: &ReservationService,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let Some(id) = prompt(input, out, "Enter Reservation ID to check time: ")? else {
        return Ok(None);
    };
    let step = parse_id(&id).map(|id| Output::Found(service.get_reservation_by_id(id)));
    Ok(Some(step))
}

fn cancel<R: BufRead, W: Write>(
    service: &ReservationService,
    input: &mut R,
    out: &mut W,
) -> io::Result<Step> {
    let Some(id) = prompt(input, out, "Enter Reservation ID to cancel: ")? else {
        return Ok(None);
    };
    let step = parse_id(&id).and_then(|id| {
        service
            .cancel_reservation(id)
            .map(Output::Cancelled)
            .map_err(|e| {
                error!(reservation_id = %id, error = %e, "Cancellation failed");
                e.to_string()
            })
    });
    Ok(Some(step))
}

/// Print `label` and read one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
