//! # Station Module
//!
//! The authoritative set of departures at one station together with the
//! station clock. All cross-departure rules live here: train numbers are
//! unique and positive, new departures must lie after the clock, and the
//! clock never runs backwards.
//!
//! Departures that the clock has passed are not purged; they simply drop out
//! of the upcoming views until removed explicitly.

use chrono::NaiveTime;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::departure::{Departure, canonical_destination};
use crate::time::{Delay, format_hhmm};

/// Reasons a station operation was refused. State is unchanged whenever one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    #[error("Train number {0} is not valid, it must be a positive number.")]
    InvalidTrainNumber(i64),

    #[error("Train number {0} already exists.")]
    DuplicateTrainNumber(u32),

    #[error("Departure time {} must be after the station clock {}.", format_hhmm(*.scheduled), format_hhmm(*.clock))]
    DepartureNotAfterClock {
        scheduled: NaiveTime,
        clock: NaiveTime,
    },

    #[error("The clock cannot be set back from {} to {}.", format_hhmm(*.current), format_hhmm(*.requested))]
    ClockWentBackwards {
        current: NaiveTime,
        requested: NaiveTime,
    },

    #[error("Train number {0} was not found.")]
    TrainNotFound(u32),

    #[error("No train to {0} was found.")]
    NoTrainTo(String),
}

/// A lazily iterated, time-ordered view of upcoming departures.
///
/// A clone continues from the current position. Call
/// `Station::get_sorted_upcoming` again to start over.
#[derive(Debug, Clone)]
pub struct Upcoming<'a> {
    inner: std::vec::IntoIter<&'a Departure>,
}

impl<'a> Iterator for Upcoming<'a> {
    type Item = &'a Departure;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Upcoming<'_> {}

/// A single station: its name, its clock and its departures keyed by train number.
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    clock: NaiveTime,
    departures: BTreeMap<u32, Departure>,
}

impl Default for Station {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_STATION_NAME)
    }
}

impl Station {
    /// Creates an empty station with its clock at 00:00.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clock: NaiveTime::MIN,
            departures: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clock(&self) -> NaiveTime {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    pub fn train_exists(&self, train_number: u32) -> bool {
        self.departures.contains_key(&train_number)
    }

    /// Registers a new departure.
    ///
    /// # Errors
    ///
    /// * `InvalidTrainNumber` if `train_number` is not a positive `u32`.
    /// * `DuplicateTrainNumber` if the number is already in use.
    /// * `DepartureNotAfterClock` if `scheduled_time` is not strictly after the clock.
    pub fn add_departure(
        &mut self,
        track: i32,
        train_number: i64,
        line: Option<&str>,
        destination: Option<&str>,
        scheduled_time: NaiveTime,
    ) -> Result<&Departure, StationError> {
        let number = u32::try_from(train_number)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(StationError::InvalidTrainNumber(train_number))
            .inspect_err(|e| warn!(error = %e, "rejected departure"))?;

        if self.train_exists(number) {
            warn!(train_number = number, "rejected duplicate train number");
            return Err(StationError::DuplicateTrainNumber(number));
        }
        if scheduled_time <= self.clock {
            warn!(
                train_number = number,
                scheduled = %format_hhmm(scheduled_time),
                clock = %format_hhmm(self.clock),
                "rejected departure scheduled before the clock"
            );
            return Err(StationError::DepartureNotAfterClock {
                scheduled: scheduled_time,
                clock: self.clock,
            });
        }

        let departure = Departure::new(track, number, line, destination, scheduled_time);
        info!(
            train_number = number,
            destination = departure.destination(),
            scheduled = %format_hhmm(scheduled_time),
            "added departure"
        );
        Ok(&*self.departures.entry(number).or_insert(departure))
    }

    /// Moves the clock forward. Setting the current time again is allowed.
    ///
    /// # Errors
    ///
    /// `ClockWentBackwards` if `new_time` is earlier than the current clock.
    pub fn set_clock(&mut self, new_time: NaiveTime) -> Result<(), StationError> {
        if new_time < self.clock {
            warn!(
                current = %format_hhmm(self.clock),
                requested = %format_hhmm(new_time),
                "rejected clock change"
            );
            return Err(StationError::ClockWentBackwards {
                current: self.clock,
                requested: new_time,
            });
        }
        self.clock = new_time;
        let departed = self
            .departures
            .values()
            .filter(|d| d.has_departed_by(new_time))
            .count();
        info!(clock = %format_hhmm(new_time), departed, "clock set");
        Ok(())
    }

    /// Removes and returns the departure with the given train number.
    pub fn remove_departure(&mut self, train_number: u32) -> Result<Departure, StationError> {
        match self.departures.remove(&train_number) {
            Some(departure) => {
                info!(train_number, "removed departure");
                Ok(departure)
            }
            None => {
                warn!(train_number, "cannot remove unknown train");
                Err(StationError::TrainNotFound(train_number))
            }
        }
    }

    pub fn get_departure(&self, train_number: u32) -> Result<&Departure, StationError> {
        self.departures
            .get(&train_number)
            .ok_or(StationError::TrainNotFound(train_number))
    }

    fn get_departure_mut(&mut self, train_number: u32) -> Result<&mut Departure, StationError> {
        self.departures
            .get_mut(&train_number)
            .ok_or(StationError::TrainNotFound(train_number))
    }

    /// Replaces the delay of a departure; `None` clears it.
    pub fn set_delay(
        &mut self,
        train_number: u32,
        delay: Option<Delay>,
    ) -> Result<&Departure, StationError> {
        let departure = self.get_departure_mut(train_number)?;
        departure.set_delay(delay);
        info!(train_number, delay = %departure.delay(), "delay set");
        Ok(&*departure)
    }

    /// Assigns a new track; anything below 1 becomes unassigned.
    pub fn set_track(&mut self, train_number: u32, track: i32) -> Result<&Departure, StationError> {
        let departure = self.get_departure_mut(train_number)?;
        departure.set_track(track);
        info!(train_number, track = departure.track(), "track set");
        Ok(&*departure)
    }

    /// Departures leaving strictly after the clock, ordered by effective
    /// departure time and then by train number.
    pub fn get_sorted_upcoming(&self) -> Upcoming<'_> {
        let mut upcoming: Vec<&Departure> = self
            .departures
            .values()
            .filter(|d| !d.has_departed_by(self.clock))
            .collect();
        upcoming.sort_by_key(|d| (d.effective_departure_time(), d.train_number()));
        debug!(count = upcoming.len(), "collected upcoming departures");
        Upcoming {
            inner: upcoming.into_iter(),
        }
    }

    /// Upcoming departures to `destination`, in any capitalisation.
    pub fn upcoming_to(&self, destination: &str) -> impl Iterator<Item = &Departure> + Clone {
        let wanted = canonical_destination(destination);
        self.get_sorted_upcoming()
            .filter(move |d| d.destination() == wanted)
    }

    /// The next upcoming departure to `destination`, in any capitalisation.
    ///
    /// # Errors
    ///
    /// `NoTrainTo` carrying the normalised destination if nothing matches.
    pub fn get_departure_by_destination(&self, destination: &str) -> Result<&Departure, StationError> {
        self.upcoming_to(destination)
            .next()
            .ok_or_else(|| StationError::NoTrainTo(canonical_destination(destination)))
    }
}
