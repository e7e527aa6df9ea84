//! # Rusty Station
//!
//! An interactive command-line tool for keeping track of the departures at a
//! single train station. Departures are added, delayed, re-tracked and removed
//! at a prompt, and the station clock is moved forward by hand.

use clap::Parser;
use dotenvy::dotenv;
use std::io::{self, BufRead, Write};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use rusty_station::constants::{self, ConfigError};
use rusty_station::session::{BoardStyle, Reply, Session};
use rusty_station::time::{Delay, format_hhmm, parse_hhmm};
use rusty_station::{AppError, Station};

/// Defines the command-line arguments for Rusty Station.
#[derive(Parser, Debug)]
#[command(
    name = "rusty_station",
    version,
    about = "An interactive departure board for a single train station.",
    long_about = None
)]
struct Cli {
    /// Name of the station. Overrides `STATION_NAME`.
    #[arg(short, long)]
    station: Option<String>,

    /// Print boards as plain fixed-width text instead of a table.
    #[arg(short, long)]
    plain: bool,

    /// Start with a few sample departures.
    #[arg(long)]
    demo: bool,
}

/// Installs the `tracing` subscriber. `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reports a configuration problem found at startup. Returns `false` when
/// the process should stop.
///
/// `graceful-config` downgrades the problem to a warning and the defaults
/// are used; otherwise `fail-fast-config` makes it fatal.
fn check_config(result: Result<(), ConfigError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) if cfg!(feature = "graceful-config") => {
            warn!(error = %e, "invalid configuration, using defaults");
            true
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            !cfg!(feature = "fail-fast-config")
        }
    }
}

/// A handful of departures to try the prompt with.
fn demo_station(name: &str) -> Result<Station, AppError> {
    let mut station = Station::new(name);
    let entries = [
        (1, 101, "L1", "Oslo", "08:00"),
        (2, 205, "R10", "Drammen", "08:20"),
        (-1, 311, "F4", "Bergen", "09:05"),
        (3, 412, "L1", "Oslo", "09:30"),
    ];
    for (track, number, line, destination, time) in entries {
        let time = parse_hhmm(time)?;
        station.add_departure(track, number, Some(line), Some(destination), time)?;
    }
    station.set_delay(205, Delay::new(0, 10))?;
    Ok(station)
}

/// The main entry point for the application.
///
/// 1. Loads environment variables from a `.env` file.
/// 2. Validates configuration; see `check_config` for how failures are handled.
/// 3. Parses command-line arguments and builds the station.
/// 4. Reads commands from standard input until `exit` or end of input.
fn main() -> Result<(), AppError> {
    // Load environment variables from a .env file, if it exists.
    let _ = dotenv();
    init_logging();

    if !check_config(constants::validate_config()) {
        std::process::exit(1);
    }

    let cli = Cli::parse();
    let name = match cli.station {
        Some(name) => name,
        None => constants::station_name()
            .unwrap_or(constants::DEFAULT_STATION_NAME)
            .to_string(),
    };
    let max_rows = constants::board_rows().unwrap_or(None);
    let style = if cli.plain {
        BoardStyle::Plain
    } else {
        BoardStyle::Table
    };

    let station = if cli.demo {
        demo_station(&name)?
    } else {
        Station::new(name)
    };
    let mut session = Session::new(station, style, max_rows);

    println!(
        "{} - clock {}. Type 'help' for commands, 'exit' to leave.",
        session.station().name(),
        format_hhmm(session.station().clock())
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match session.execute_line(&line?)? {
            Reply::Text(text) if text.is_empty() => {}
            Reply::Text(text) => println!("{text}"),
            Reply::Exit => break,
        }
    }

    println!("\nExiting...");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_station_has_sample_departures() {
        let station = demo_station("Demo").unwrap();
        assert_eq!(station.name(), "Demo");
        assert_eq!(station.len(), 4);
        let first = station.get_sorted_upcoming().next().unwrap();
        assert_eq!(first.train_number(), 101);
        assert_eq!(station.get_departure(311).unwrap().track(), -1);
    }

    #[test]
    fn valid_config_always_continues() {
        assert!(check_config(Ok(())));
    }

    #[test]
    fn invalid_config_follows_features() {
        let keep_going = check_config(Err(ConfigError::EmptyVar("STATION_NAME")));
        let expected = cfg!(feature = "graceful-config") || !cfg!(feature = "fail-fast-config");
        assert_eq!(keep_going, expected);
    }

    #[cfg(all(feature = "fail-fast-config", not(feature = "graceful-config")))]
    #[test]
    fn invalid_config_is_fatal_by_default() {
        assert!(!check_config(Err(ConfigError::InvalidVar("BOARD_ROWS", "0".to_string()))));
    }

    #[test]
    fn cli_flags() {
        let cli = Cli::parse_from(["rusty_station", "--plain", "--station", "Oslo S"]);
        assert!(cli.plain);
        assert!(!cli.demo);
        assert_eq!(cli.station.as_deref(), Some("Oslo S"));
    }
}
