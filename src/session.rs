//! # Session Module
//!
//! The operator's command set. Each line typed at the prompt is split into
//! words, parsed with `clap`, and run against the station. Bad input never
//! ends a session: usage errors and refused operations come back as text.

use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::constants::UNASSIGNED_TRACK;
use crate::departure::{canonical_destination, track_from_input};
use crate::departure_board::{DepartureBoard, next_departure_message, no_trains_message};
use crate::error::AppError;
use crate::station::Station;
use crate::time::{Delay, format_hhmm, parse_hhmm};

/// A single line of operator input.
#[derive(Parser, Debug)]
#[command(
    name = "station",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Manage the departures of the station."
)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

/// Operations available at the prompt.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show all upcoming departures.
    #[command(visible_aliases = ["l", "ls"])]
    List {
        /// Print the board as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show all upcoming departures to a destination.
    To { destination: String },
    /// Show the next departure to a destination.
    Next { destination: String },
    /// Add a new departure.
    Add {
        #[arg(allow_negative_numbers = true)]
        train_number: i64,
        destination: String,
        #[arg(value_parser = parse_hhmm)]
        time: NaiveTime,
        #[arg(short, long)]
        line: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        track: Option<String>,
    },
    /// Set the delay of a departure (HH:MM). Leave out the delay to clear it.
    Delay {
        train_number: u32,
        #[arg(value_parser = Delay::parse)]
        delay: Option<Delay>,
    },
    /// Set the track of a departure.
    Track {
        train_number: u32,
        #[arg(allow_hyphen_values = true)]
        track: String,
    },
    /// Show a departure by train number.
    Get { train_number: u32 },
    /// Remove a departure by train number.
    Remove { train_number: u32 },
    /// Move the station clock forward.
    Clock {
        #[arg(value_parser = parse_hhmm)]
        time: NaiveTime,
    },
    /// Clear the terminal.
    Clear,
    /// Leave the session.
    #[command(visible_aliases = ["quit", "q"])]
    Exit,
}

/// How boards are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStyle {
    Plain,
    Table,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Exit,
}

/// Splits a line into words. Double quotes group words containing spaces.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// An operator session over one station.
#[derive(Debug)]
pub struct Session {
    station: Station,
    style: BoardStyle,
    max_rows: Option<usize>,
}

impl Session {
    pub fn new(station: Station, style: BoardStyle, max_rows: Option<usize>) -> Self {
        Self {
            station,
            style,
            max_rows,
        }
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    /// Parses and runs one line of input.
    ///
    /// # Errors
    ///
    /// Only errors the session cannot recover from (I/O, serialization) are
    /// returned; everything caused by the operator becomes `Reply::Text`.
    pub fn execute_line(&mut self, line: &str) -> Result<Reply, AppError> {
        let words = split_words(line);
        if words.is_empty() {
            return Ok(Reply::Text(String::new()));
        }
        let parsed = match CommandLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(Reply::Text(e.render().to_string().trim_end().to_string())),
        };
        debug!(command = ?parsed.command, "executing command");
        match self.execute(parsed.command) {
            Err(e) if e.is_recoverable() => Ok(Reply::Text(e.to_string())),
            other => other,
        }
    }

    /// Runs a parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Reply, AppError> {
        let text = match command {
            Command::List { json } => {
                let board = DepartureBoard::new(self.board_title(), self.station.get_sorted_upcoming())
                    .limit(self.max_rows);
                if json {
                    board.to_json()?
                } else {
                    self.render(&board)
                }
            }
            Command::To { destination } => {
                let board = DepartureBoard::new(
                    format!("{} to {}", self.board_title(), canonical_destination(&destination)),
                    self.station.upcoming_to(&destination),
                )
                .limit(self.max_rows);
                if board.is_empty() {
                    no_trains_message(&destination)
                } else {
                    self.render(&board)
                }
            }
            Command::Next { destination } => {
                next_departure_message(self.station.get_departure_by_destination(&destination)?)
            }
            Command::Add {
                train_number,
                destination,
                time,
                line,
                track,
            } => {
                let track = track.as_deref().map_or(UNASSIGNED_TRACK, track_from_input);
                let departure = self.station.add_departure(
                    track,
                    train_number,
                    line.as_deref(),
                    Some(destination.as_str()),
                    time,
                )?;
                format!(
                    "Added train {} to {} at {}.",
                    departure.train_number(),
                    departure.destination(),
                    format_hhmm(departure.scheduled_time())
                )
            }
            Command::Delay {
                train_number,
                delay,
            } => {
                let departure = self.station.set_delay(train_number, delay)?;
                format!(
                    "Train {} now departs at {} (delay {}).",
                    train_number,
                    format_hhmm(departure.effective_departure_time()),
                    departure.delay()
                )
            }
            Command::Track {
                train_number,
                track,
            } => {
                let departure = self.station.set_track(train_number, track_from_input(&track))?;
                match departure.platform() {
                    Some(track) => format!("Train {train_number} now departs from track {track}."),
                    None => format!("Train {train_number} has no track assigned."),
                }
            }
            Command::Get { train_number } => {
                let departure = self.station.get_departure(train_number)?;
                self.render(&DepartureBoard::new(format!("Train {train_number}"), [departure]))
            }
            Command::Remove { train_number } => {
                let departure = self.station.remove_departure(train_number)?;
                format!(
                    "Removed train {} to {}.",
                    departure.train_number(),
                    departure.destination()
                )
            }
            Command::Clock { time } => {
                self.station.set_clock(time)?;
                format!("Clock set to {}.", format_hhmm(time))
            }
            Command::Clear => {
                clearscreen::clear()?;
                String::new()
            }
            Command::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Text(text))
    }

    fn board_title(&self) -> String {
        format!(
            "Departures from {} at {}",
            self.station.name(),
            format_hhmm(self.station.clock())
        )
    }

    fn render(&self, board: &DepartureBoard<'_>) -> String {
        let body = match self.style {
            BoardStyle::Plain => board.plain(),
            BoardStyle::Table => board.table().to_string(),
        };
        let body = body.strip_suffix('\n').unwrap_or(&body);
        format!("{}\n{}", board.title(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Station::new("Trondheim S"), BoardStyle::Plain, None)
    }

    fn run(session: &mut Session, line: &str) -> String {
        match session.execute_line(line).unwrap() {
            Reply::Text(text) => text,
            Reply::Exit => panic!("unexpected exit for {line:?}"),
        }
    }

    #[test]
    fn split_words_respects_quotes() {
        assert_eq!(split_words("add 1 oslo 08:00"), vec!["add", "1", "oslo", "08:00"]);
        assert_eq!(
            split_words(r#"add 2 "Mo i Rana" 09:15 --line R1"#),
            vec!["add", "2", "Mo i Rana", "09:15", "--line", "R1"]
        );
        assert_eq!(split_words(r#"to """#), vec!["to", ""]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn add_delay_and_list() {
        let mut session = session();
        assert_eq!(
            run(&mut session, "add 101 oslo 08:00 --line L1 --track 1"),
            "Added train 101 to Oslo at 08:00."
        );
        assert_eq!(
            run(&mut session, "delay 101 00:15"),
            "Train 101 now departs at 08:15 (delay 00:15)."
        );
        let listing = run(&mut session, "list");
        let mut lines = listing.lines();
        assert_eq!(lines.next(), Some("Departures from Trondheim S at 00:00"));
        assert!(lines.next().unwrap().starts_with("Train number"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("101            L1   Oslo                08:15"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn plain_rows_keep_their_padding() {
        let mut session = session();
        run(&mut session, "add 1 oslo 08:00 --track 2");
        run(&mut session, "add 2 bergen 09:00");
        let listing = run(&mut session, "list");
        let widths: Vec<usize> = listing.lines().skip(1).map(str::len).collect();
        assert_eq!(widths, vec![65, 65, 65]);
    }

    #[test]
    fn delay_without_value_clears_it() {
        let mut session = session();
        run(&mut session, "add 5 bergen 10:00");
        run(&mut session, "delay 5 01:00");
        assert_eq!(
            run(&mut session, "delay 5"),
            "Train 5 now departs at 10:00 (delay 00:00)."
        );
    }

    #[test]
    fn rejections_are_reported_as_text() {
        let mut session = session();
        run(&mut session, "add 1 oslo 08:00");
        assert_eq!(run(&mut session, "add 1 bergen 09:00"), "Train number 1 already exists.");
        assert_eq!(
            run(&mut session, "add -4 bergen 09:00"),
            "Train number -4 is not valid, it must be a positive number."
        );
        assert_eq!(run(&mut session, "get 99"), "Train number 99 was not found.");
        assert_eq!(run(&mut session, "remove 99"), "Train number 99 was not found.");
        run(&mut session, "clock 09:00");
        assert_eq!(
            run(&mut session, "clock 08:00"),
            "The clock cannot be set back from 09:00 to 08:00."
        );
        assert_eq!(session.station().len(), 1);
    }

    #[test]
    fn usage_errors_are_reported_as_text() {
        let mut session = session();
        assert!(run(&mut session, "add 1 oslo 25:00").contains("hour must be 0-23"));
        assert!(run(&mut session, "fly away").starts_with("error:"));
        assert!(run(&mut session, "help").contains("Show all upcoming departures"));
        assert_eq!(run(&mut session, ""), "");
    }

    #[test]
    fn non_numeric_track_is_unassigned() {
        let mut session = session();
        run(&mut session, "add 3 oslo 08:00 --track two");
        assert_eq!(session.station().get_departure(3).unwrap().track(), -1);
        assert_eq!(run(&mut session, "track 3 4"), "Train 3 now departs from track 4.");
        assert_eq!(run(&mut session, "track 3 -2"), "Train 3 has no track assigned.");
    }

    #[test]
    fn destination_queries() {
        let mut session = session();
        run(&mut session, "add 1 oslo 08:00 --track 2");
        run(&mut session, "add 2 OSLO 07:00");
        assert_eq!(
            run(&mut session, "next Oslo"),
            "The next train to Oslo departs at 07:00 from track -"
        );
        assert_eq!(run(&mut session, "next bodø"), "No train to Bodø was found.");
        assert_eq!(run(&mut session, "to bodø"), "No trains to Bodø found.");
        let listing = run(&mut session, "to oslo");
        assert!(listing.starts_with("Departures from Trondheim S at 00:00 to Oslo\n"));
        assert_eq!(listing.lines().count(), 4);
    }

    #[test]
    fn remove_then_get() {
        let mut session = session();
        run(&mut session, "add 101 oslo 08:00");
        assert_eq!(run(&mut session, "remove 101"), "Removed train 101 to Oslo.");
        assert_eq!(run(&mut session, "get 101"), "Train number 101 was not found.");
    }

    #[test]
    fn list_respects_row_limit_and_json() {
        let mut session = Session::new(Station::new("Test"), BoardStyle::Plain, Some(1));
        run(&mut session, "add 1 oslo 08:00");
        run(&mut session, "add 2 bergen 09:00");
        assert_eq!(run(&mut session, "list").lines().count(), 3);
        let json: serde_json::Value = serde_json::from_str(&run(&mut session, "list --json")).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn table_style_renders_box_drawing() {
        let mut session = Session::new(Station::new("Test"), BoardStyle::Table, None);
        run(&mut session, "add 1 oslo 08:00");
        assert!(run(&mut session, "ls").contains('╭'));
    }

    #[test]
    fn exit_aliases() {
        let mut session = session();
        assert_eq!(session.execute_line("exit").unwrap(), Reply::Exit);
        assert_eq!(session.execute_line("q").unwrap(), Reply::Exit);
    }
}
