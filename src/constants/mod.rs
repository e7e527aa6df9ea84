//! # Constants and Configuration Module
//!
//! This module defines the fixed values the departure model and the board
//! rendering rely on, and handles loading station configuration from
//! environment variables (optionally via a `.env` file).
//!
//! Configuration values are loaded lazily and cached on their first use.

use once_cell::sync::OnceCell;
use std::env;
use std::fmt;

/// Stored track value meaning "no track assigned".
pub const UNASSIGNED_TRACK: i32 = -1;
/// Stored destination when none was given.
pub const INVALID_DESTINATION: &str = "Invalid destination";

/// Minimum column widths of the plain departures listing, in order:
/// train number, line, destination, departure time, track.
pub const COLUMN_WIDTHS: [usize; 5] = [15, 5, 20, 15, 10];
/// Column headings of the departures listing.
pub const COLUMN_HEADERS: [&str; 5] = ["Train number", "Line", "Destination", "Departure time", "Track"];

/// Station name used when `STATION_NAME` is not set.
pub const DEFAULT_STATION_NAME: &str = "Central Station";

const STATION_NAME_VAR: &str = "STATION_NAME";
const BOARD_ROWS_VAR: &str = "BOARD_ROWS";

/// Represents errors that can occur when loading configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The environment variable is set but contains an empty or whitespace-only value.
    EmptyVar(&'static str),
    /// The environment variable is set but its value cannot be used.
    InvalidVar(&'static str, String),
}

impl fmt::Display for ConfigError {
    /// Formats the configuration error for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use rusty_station::constants::ConfigError;
    ///
    /// let empty_error = ConfigError::EmptyVar("STATION_NAME");
    /// assert_eq!(
    ///     empty_error.to_string(),
    ///     "Environment variable 'STATION_NAME' is set but empty. \
    ///      Unset it or give it a value."
    /// );
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyVar(var) => write!(
                f,
                "Environment variable '{var}' is set but empty. \
                Unset it or give it a value."
            ),
            ConfigError::InvalidVar(var, value) => write!(
                f,
                "Environment variable '{var}' has invalid value '{value}'. \
                Fix it in your shell or .env file."
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Cached station name.
static STATION_NAME_CELL: OnceCell<String> = OnceCell::new();
/// Cached row limit for rendered boards.
static BOARD_ROWS_CELL: OnceCell<Option<usize>> = OnceCell::new();

/// A generic helper to lazily load, parse, and cache a configuration value.
///
/// The `fetch` closure runs at most once per cell. A missing variable is
/// handed to `parse` as `None`; a set but blank one is always an error.
fn load_with<T, F, P>(
    var: &'static str,
    cell: &'static OnceCell<T>,
    fetch: F,
    parse: P,
) -> Result<&'static T, ConfigError>
where
    F: for<'a> Fn(&'a str) -> Result<String, env::VarError>,
    P: Fn(Option<&str>) -> Result<T, ConfigError>,
{
    cell.get_or_try_init(|| match fetch(var) {
        Ok(val) if val.trim().is_empty() => Err(ConfigError::EmptyVar(var)),
        Ok(val) => parse(Some(val.trim())),
        Err(_) => parse(None),
    })
}

fn parse_station_name(value: Option<&str>) -> Result<String, ConfigError> {
    Ok(value.unwrap_or(DEFAULT_STATION_NAME).to_string())
}

fn parse_board_rows(value: Option<&str>) -> Result<Option<usize>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<usize>() {
            Ok(rows) if rows > 0 => Ok(Some(rows)),
            _ => Err(ConfigError::InvalidVar(BOARD_ROWS_VAR, raw.to_string())),
        },
    }
}

/// Retrieves the station name (`STATION_NAME`), defaulting to
/// [`DEFAULT_STATION_NAME`].
///
/// # Errors
///
/// Returns `ConfigError` if the variable is set but empty.
pub fn station_name() -> Result<&'static str, ConfigError> {
    load_with(STATION_NAME_VAR, &STATION_NAME_CELL, |s| env::var(s), parse_station_name)
        .map(String::as_str)
}

/// Retrieves the maximum number of rows to render (`BOARD_ROWS`).
///
/// # Errors
///
/// Returns `ConfigError` if the variable is set but is not a positive integer.
pub fn board_rows() -> Result<Option<usize>, ConfigError> {
    load_with(BOARD_ROWS_VAR, &BOARD_ROWS_CELL, |s| env::var(s), parse_board_rows).copied()
}

/// Eagerly validates every configuration value.
///
/// Intended to be called at startup to "fail fast" on a bad environment.
pub fn validate_config() -> Result<(), ConfigError> {
    station_name()?;
    board_rows()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_station_name_uses_default() {
        static CELL: OnceCell<String> = OnceCell::new();
        let name = load_with("X", &CELL, |_| Err(env::VarError::NotPresent), parse_station_name);
        assert_eq!(name.unwrap(), DEFAULT_STATION_NAME);
    }

    #[test]
    fn station_name_is_trimmed_and_cached() {
        static CELL: OnceCell<String> = OnceCell::new();
        let first = load_with("X", &CELL, |_| Ok(" Oslo S ".to_string()), parse_station_name);
        assert_eq!(first.unwrap(), "Oslo S");
        let second = load_with("X", &CELL, |_| Ok("Bergen".to_string()), parse_station_name);
        assert_eq!(second.unwrap(), "Oslo S");
    }

    #[test]
    fn blank_value_is_an_error() {
        static CELL: OnceCell<String> = OnceCell::new();
        let result = load_with("STATION_NAME", &CELL, |_| Ok("  ".to_string()), parse_station_name);
        assert_eq!(result.unwrap_err(), ConfigError::EmptyVar("STATION_NAME"));
    }

    #[test]
    fn board_rows_parsing() {
        assert_eq!(parse_board_rows(None), Ok(None));
        assert_eq!(parse_board_rows(Some("5")), Ok(Some(5)));
        assert_eq!(
            parse_board_rows(Some("0")),
            Err(ConfigError::InvalidVar("BOARD_ROWS", "0".to_string()))
        );
        assert!(parse_board_rows(Some("many")).is_err());
    }

    #[test]
    fn invalid_var_display() {
        let err = ConfigError::InvalidVar("BOARD_ROWS", "many".to_string());
        assert_eq!(
            err.to_string(),
            "Environment variable 'BOARD_ROWS' has invalid value 'many'. \
            Fix it in your shell or .env file."
        );
    }
}
