//! # Departure Board Module
//!
//! Turns an ordered set of departures into something a person can read: a
//! plain fixed-width listing, a styled `comfy_table` board, or JSON.

use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
    modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS},
    presets::UTF8_FULL,
};
use serde::Serialize;

use crate::constants::{COLUMN_HEADERS, COLUMN_WIDTHS};
use crate::departure::{Departure, canonical_destination};
use crate::time::format_hhmm;

/// Serializable row of a departure board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub train_number: u32,
    pub line: Option<String>,
    pub destination: String,
    pub scheduled: String,
    pub delay: String,
    pub departs: String,
    pub track: Option<u32>,
}

impl From<&Departure> for BoardEntry {
    fn from(departure: &Departure) -> Self {
        Self {
            train_number: departure.train_number(),
            line: departure.line().map(str::to_string),
            destination: departure.destination().to_string(),
            scheduled: format_hhmm(departure.scheduled_time()),
            delay: departure.delay().to_string(),
            departs: format_hhmm(departure.effective_departure_time()),
            track: departure.platform(),
        }
    }
}

/// The track column: the number, or `-` when unassigned.
fn track_text(departure: &Departure) -> String {
    match departure.platform() {
        Some(track) => track.to_string(),
        None => "-".to_string(),
    }
}

/// Lays out one row of the plain listing using the fixed column widths.
fn plain_row(columns: [&str; 5]) -> String {
    columns
        .iter()
        .zip(COLUMN_WIDTHS)
        .map(|(text, width)| format!("{text:<width$}"))
        .collect()
}

/// Creates and configures a new `comfy_table::Table` with default styling.
fn create_table(headers: [&str; 5]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.into_iter().map(|h| {
            Cell::new(h)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center)
        }));
    table
}

/// Green for an on-time departure, red once it carries a delay.
fn colourise_departure(departure: &Departure) -> Cell {
    let color = if departure.delay().is_zero() {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(format_hhmm(departure.effective_departure_time()))
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Center)
        .fg(color)
}

/// An ordered view of departures ready to be rendered.
#[derive(Debug, Clone)]
pub struct DepartureBoard<'a> {
    title: String,
    departures: Vec<&'a Departure>,
}

impl<'a> DepartureBoard<'a> {
    pub fn new(title: impl Into<String>, departures: impl IntoIterator<Item = &'a Departure>) -> Self {
        Self {
            title: title.into(),
            departures: departures.into_iter().collect(),
        }
    }

    /// Keeps only the first `max_rows` departures, if a limit is given.
    pub fn limit(mut self, max_rows: Option<usize>) -> Self {
        if let Some(rows) = max_rows {
            self.departures.truncate(rows);
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    /// Header line plus one fixed-width row per departure, each line
    /// newline-terminated.
    pub fn plain(&self) -> String {
        let mut out = plain_row(COLUMN_HEADERS);
        out.push('\n');
        for departure in &self.departures {
            let number = departure.train_number().to_string();
            let departs = format_hhmm(departure.effective_departure_time());
            let track = track_text(departure);
            out.push_str(&plain_row([
                number.as_str(),
                departure.line().unwrap_or_default(),
                departure.destination(),
                departs.as_str(),
                track.as_str(),
            ]));
            out.push('\n');
        }
        out
    }

    /// The same listing as a styled terminal table.
    pub fn table(&self) -> Table {
        let mut table = create_table(COLUMN_HEADERS);
        for departure in &self.departures {
            table.add_row(vec![
                Cell::new(departure.train_number()).set_alignment(CellAlignment::Right),
                Cell::new(departure.line().unwrap_or_default()).set_alignment(CellAlignment::Center),
                Cell::new(departure.destination()),
                colourise_departure(departure),
                Cell::new(track_text(departure)).set_alignment(CellAlignment::Center),
            ]);
        }
        table
    }

    pub fn entries(&self) -> Vec<BoardEntry> {
        self.departures.iter().map(|d| BoardEntry::from(*d)).collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries())
    }
}

/// `No trains to <Destination> found.`
pub fn no_trains_message(destination: &str) -> String {
    format!("No trains to {} found.", canonical_destination(destination))
}

/// One-line summary of the next train to a destination.
pub fn next_departure_message(departure: &Departure) -> String {
    format!(
        "The next train to {} departs at {} from track {}",
        departure.destination(),
        format_hhmm(departure.effective_departure_time()),
        track_text(departure)
    )
}
