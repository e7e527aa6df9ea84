use crate::{constants::ConfigError, station::StationError, time::TimeError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Station(#[from] StationError),

    #[error("{0}")]
    Time(#[from] TimeError),

    #[error("Failed to serialize board: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Screen clearing failed: {0}")]
    ClearScreen(#[from] clearscreen::Error),
}

impl AppError {
    /// Errors caused by operator input. The session reports these and
    /// carries on; anything else ends the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Station(_) | AppError::Time(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_errors_display_as_is() {
        let err = AppError::from(StationError::TrainNotFound(42));
        assert_eq!(err.to_string(), "Train number 42 was not found.");
        assert!(err.is_recoverable());
    }

    #[test]
    fn config_errors_are_fatal() {
        let err = AppError::from(ConfigError::EmptyVar("STATION_NAME"));
        assert!(err.to_string().starts_with("Configuration error: "));
        assert!(!err.is_recoverable());
    }
}
