//! Tablebook CLI: table reservations from the command line.
//!
//! Two modes:
//! - **Shell mode**: `tablebook [flags] COMMAND`, a single operation, then exit
//! - **Menu mode**: `tablebook [flags]` or `tablebook menu`, the interactive menu on stdin
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `warn`).

mod commands;
mod format;
mod menu;
mod parse;

use std::io;
use std::process;

use anyhow::Context;
use tablebook_engine::ReservationService;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, Output, OutputMode};
use parse::{matches_to_action, CliAction};

fn main() {
    init_tracing();

    let matches = build_cli().get_matches();
    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let service = match open_service(&matches) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("{}", format_error(&format!("{:#}", e), output_mode));
            process::exit(1);
        }
    };

    let exit_code = match matches_to_action(&matches) {
        Ok(CliAction::Menu) => run_menu_mode(&service),
        Ok(action) => run_shell_mode(&service, action, output_mode),
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            1
        }
    };
    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_service(matches: &clap::ArgMatches) -> anyhow::Result<ReservationService> {
    if matches.get_flag("ephemeral") {
        return ReservationService::ephemeral().context("Failed to start in-memory reservations");
    }
    let path = matches
        .get_one::<String>("data-dir")
        .map(|s| s.as_str())
        .unwrap_or(".tablebook");
    ReservationService::open(path)
        .with_context(|| format!("Failed to open reservations in '{}'", path))
}

fn run_shell_mode(service: &ReservationService, action: CliAction, mode: OutputMode) -> i32 {
    let result = match action {
        CliAction::Reserve {
            name,
            party,
            date,
            time,
        } => service
            .create_reservation(&name, party, date, time)
            .map(Output::Created),
        CliAction::Slots { date } => service.available_slots(date).map(Output::Slots),
        CliAction::Show { id } => Ok(Output::Found(service.get_reservation_by_id(id))),
        CliAction::Cancel { id } => service.cancel_reservation(id).map(Output::Cancelled),
        CliAction::Menu => return run_menu_mode(service),
    };

    match result {
        Ok(output) => {
            println!("{}", format_output(&output, mode));
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    }
}

fn run_menu_mode(service: &ReservationService) -> i32 {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    match menu::run_menu(service, &mut input, &mut out) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
