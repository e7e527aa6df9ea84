//! # Rusty Station
//!
//! Departure bookkeeping for a single train station: the departures leaving
//! it, their tracks and delays, and the station clock that decides which of
//! them are still upcoming.

pub mod constants;
pub mod departure;
pub mod departure_board;
pub mod error;
pub mod session;
pub mod station;
pub mod time;

pub use departure::Departure;
pub use error::AppError;
pub use station::{Station, StationError};
pub use time::Delay;
