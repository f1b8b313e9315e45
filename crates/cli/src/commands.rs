//! Clap command tree definition.
//!
//! Shell mode parses the process arguments with `build_cli()`; every
//! subcommand is a single reservation operation.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("tablebook")
        .about("Restaurant table reservations")
        .subcommand_required(false)
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Data directory (default: .tablebook)")
                .global(true),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .help("In-memory reservations, nothing written to disk")
                .action(ArgAction::SetTrue)
                .conflicts_with("data-dir")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_reserve())
        .subcommand(build_slots())
        .subcommand(build_show())
        .subcommand(build_cancel())
        .subcommand(Command::new("menu").about("Interactive reservation menu"))
}

fn build_reserve() -> Command {
    Command::new("reserve")
        .about("Book a table for a party")
        .arg(
            Arg::new("name")
                .long("name")
                .required(true)
                .help("Customer name"),
        )
        .arg(
            Arg::new("party")
                .long("party")
                .required(true)
                .help("Party size"),
        )
        .arg(date_arg())
        .arg(
            Arg::new("time")
                .long("time")
                .required(true)
                .help("Time (HH:MM)"),
        )
}

fn build_slots() -> Command {
    Command::new("slots")
        .about("Show free times of every table on a date")
        .arg(date_arg())
}

fn build_show() -> Command {
    Command::new("show")
        .about("Show the date and time of a reservation")
        .arg(id_arg())
}

fn build_cancel() -> Command {
    Command::new("cancel")
        .about("Cancel a reservation")
        .arg(id_arg())
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .required(true)
        .help("Date (YYYY-MM-DD)")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .help("Reservation ID")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn reserve_requires_every_field() {
        let result = build_cli().try_get_matches_from(["tablebook", "reserve", "--name", "Ada"]);
        assert!(result.is_err());
    }

    #[test]
    fn ephemeral_conflicts_with_data_dir() {
        let result = build_cli().try_get_matches_from([
            "tablebook",
            "--ephemeral",
            "--data-dir",
            "x",
            "menu",
        ]);
        assert!(result.is_err());
    }
}
