//! Error types for grid processing.

use thiserror::Error;

/// Errors that can occur during grid processing.
///
/// Empty or degenerate inputs are not errors; they produce empty or
/// all-undefined grids.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// The requested grid resolution cannot form a mesh.
    #[error("invalid grid resolution {0}: need at least 2 steps per axis")]
    InvalidResolution(usize),

    /// Smoothing strength must be finite and non-negative.
    #[error("invalid smoothing strength: {0}")]
    InvalidSmoothing(f64),

    /// An input coordinate or value was not a finite number.
    #[error("non-finite input at point {index}: ({x}, {y}) = {value}")]
    NonFiniteInput {
        index: usize,
        x: f64,
        y: f64,
        value: f64,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Grid assembly failed.
    #[error("grid error: {0}")]
    Grid(#[from] ocean_common::OceanError),
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
