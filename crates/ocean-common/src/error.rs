//! Error types for the shared ocean data model.

use thiserror::Error;

/// Result type alias using OceanError.
pub type OceanResult<T> = Result<T, OceanError>;

/// Primary error type for data model operations.
#[derive(Debug, Error)]
pub enum OceanError {
    #[error("Invalid time key: {0}")]
    InvalidTimeKey(String),

    #[error("Year {0} cannot be encoded in a four-digit time key")]
    YearOutOfRange(i32),

    #[error("Unknown channel id: {0}")]
    UnknownChannel(u8),

    #[error("Non-finite value for {channel} at row {row}")]
    NonFiniteValue { channel: String, row: usize },

    #[error("Grid dimension mismatch: expected {expected} values, got {actual}")]
    GridMismatch { expected: usize, actual: usize },
}

impl From<chrono::ParseError> for OceanError {
    fn from(err: chrono::ParseError) -> Self {
        OceanError::InvalidTimeKey(err.to_string())
    }
}
