//! # Time Module
//!
//! Wall-clock handling for the station. Times are entered by an operator as
//! "HH:MM" strings with no date or timezone attached, so everything here is
//! built on `chrono::NaiveTime` and wraps at midnight.

use chrono::{NaiveTime, TimeDelta, Timelike};
use std::fmt;
use std::ops::Add;

/// Error returned when parsing an invalid time or delay string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time '{input}': {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Splits "H:MM" / "HH:MM" into its hour and minute components.
fn split_hhmm(s: &str) -> Result<(u32, u32), TimeError> {
    let trimmed = s.trim();
    let (hour, minute) = trimmed
        .split_once(':')
        .ok_or_else(|| TimeError::new(s, "expected HH:MM format"))?;

    if hour.is_empty() || hour.len() > 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new(s, "invalid hour digits"));
    }
    if minute.len() != 2 || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new(s, "invalid minute digits"));
    }

    let hour: u32 = hour
        .parse()
        .map_err(|_| TimeError::new(s, "invalid hour digits"))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| TimeError::new(s, "invalid minute digits"))?;

    if hour > 23 {
        return Err(TimeError::new(s, "hour must be 0-23"));
    }
    if minute > 59 {
        return Err(TimeError::new(s, "minute must be 0-59"));
    }
    Ok((hour, minute))
}

/// Parses a wall-clock time from "HH:MM" (a single hour digit is accepted).
///
/// # Examples
///
/// ```
/// use rusty_station::time::parse_hhmm;
///
/// assert!(parse_hhmm("08:00").is_ok());
/// assert!(parse_hhmm("8:05").is_ok());
/// assert!(parse_hhmm("24:00").is_err());
/// assert!(parse_hhmm("0800").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let (hour, minute) = split_hhmm(s)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new(s, "invalid time"))
}

/// Formats a time as zero-padded "HH:MM".
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// A non-negative delay in whole minutes.
///
/// A delay is always applied to the original scheduled time, so it is a
/// plain offset rather than an adjusted clock value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Delay {
    minutes: u32,
}

impl Delay {
    /// No delay.
    pub const ZERO: Delay = Delay { minutes: 0 };

    /// Creates a delay of `hours:minutes`. Returns `None` if `minutes > 59`.
    pub fn new(hours: u32, minutes: u32) -> Option<Self> {
        if minutes > 59 {
            return None;
        }
        hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .map(Self::from_minutes)
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Parses a delay written as "HH:MM".
    ///
    /// ```
    /// use rusty_station::time::Delay;
    ///
    /// assert_eq!(Delay::parse("00:15").unwrap().as_minutes(), 15);
    /// assert_eq!(Delay::parse("1:30").unwrap().as_minutes(), 90);
    /// assert!(Delay::parse("-0:15").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let (hour, minute) = split_hhmm(s)?;
        Ok(Self::from_minutes(hour * 60 + minute))
    }

    pub fn as_minutes(&self) -> u32 {
        self.minutes
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

/// Applying a delay wraps at midnight; day boundaries are not tracked.
impl Add<Delay> for NaiveTime {
    type Output = NaiveTime;

    fn add(self, rhs: Delay) -> Self::Output {
        self.overflowing_add_signed(rhs.as_time_delta()).0
    }
}
