//! Error types for classification and contour output.

use thiserror::Error;

/// Errors raised for malformed renderer input.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot classify an empty value column")]
    EmptyValues,

    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    #[error("Level set needs at least 3 non-decreasing breakpoints and one color per interval (got {breakpoints} breakpoints, {colors} colors)")]
    InvalidLevelSet { breakpoints: usize, colors: usize },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;
