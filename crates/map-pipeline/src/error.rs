//! Error types for the map pipeline.

use grid_processor::GridProcessorError;
use ocean_common::{OceanError, Provenance};
use renderer::RenderError;
use thiserror::Error;

/// Errors that can occur while serving a request.
///
/// An empty selection is not an error; it produces an empty outcome.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A derived row names an observation label that does not exist.
    #[error("{provenance} row references unknown observation label {label}")]
    MissingJoinKey { provenance: Provenance, label: u64 },

    /// A derived row carries no label at all.
    #[error("{provenance} row {row} has no observation label")]
    UnlabeledRow { provenance: Provenance, row: usize },

    /// Invalid time key, channel id or grid shape.
    #[error("Data error: {0}")]
    Data(#[from] OceanError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridProcessorError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Reported by a point source.
    #[error("Source error: {0}")]
    Source(String),

    /// Reported by a render or diagram sink.
    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
