use chrono::NaiveTime;

use crate::constants::{INVALID_DESTINATION, UNASSIGNED_TRACK};
use crate::time::Delay;

/// Brings a destination into canonical form: first character upper-case,
/// the rest lower-case. Surrounding whitespace is dropped.
///
/// ```
/// use rusty_station::departure::canonical_destination;
///
/// assert_eq!(canonical_destination("oSLO"), "Oslo");
/// assert_eq!(canonical_destination("  bergen "), "Bergen");
/// assert_eq!(canonical_destination(""), "");
/// ```
pub fn canonical_destination(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Maps any track below 1 onto the unassigned sentinel.
pub fn sanitize_track(track: i32) -> i32 {
    if track < 1 { UNASSIGNED_TRACK } else { track }
}

/// Reads a track typed by an operator. Non-numeric input is unassigned.
pub fn track_from_input(text: &str) -> i32 {
    text.trim()
        .parse::<i32>()
        .map(sanitize_track)
        .unwrap_or(UNASSIGNED_TRACK)
}

/// One scheduled train run leaving the station.
///
/// The train number, line, destination and scheduled time are fixed at
/// creation. Only the track and the delay change afterwards, and the
/// effective departure time is always derived from the scheduled time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    track: i32,
    train_number: u32,
    line: Option<String>,
    destination: String,
    scheduled_time: NaiveTime,
    delay: Delay,
}

impl Departure {
    /// Builds a departure with zero delay. Train number uniqueness and the
    /// clock check are the station's job; see `Station::add_departure`.
    pub(crate) fn new(
        track: i32,
        train_number: u32,
        line: Option<&str>,
        destination: Option<&str>,
        scheduled_time: NaiveTime,
    ) -> Self {
        let line = line
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        let destination = destination
            .map(canonical_destination)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| INVALID_DESTINATION.to_string());

        Self {
            track: sanitize_track(track),
            train_number,
            line,
            destination,
            scheduled_time,
            delay: Delay::ZERO,
        }
    }

    /// The raw track, `-1` when unassigned.
    pub fn track(&self) -> i32 {
        self.track
    }

    /// The track as a platform number, `None` when unassigned.
    pub fn platform(&self) -> Option<u32> {
        u32::try_from(self.track).ok().filter(|&t| t > 0)
    }

    pub fn train_number(&self) -> u32 {
        self.train_number
    }

    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn scheduled_time(&self) -> NaiveTime {
        self.scheduled_time
    }

    pub fn delay(&self) -> Delay {
        self.delay
    }

    /// Scheduled time plus the current delay, wrapping at midnight.
    pub fn effective_departure_time(&self) -> NaiveTime {
        self.scheduled_time + self.delay
    }

    /// True once the station clock has reached the effective departure time.
    pub fn has_departed_by(&self, clock: NaiveTime) -> bool {
        self.effective_departure_time() <= clock
    }

    pub fn set_track(&mut self, track: i32) {
        self.track = sanitize_track(track);
    }

    /// Replaces the delay. `None` resets it to zero.
    pub fn set_delay(&mut self, delay: Option<Delay>) {
        self.delay = delay.unwrap_or_default();
    }
}
