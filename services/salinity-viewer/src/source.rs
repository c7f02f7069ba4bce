//! Point dump on disk.

use std::fs;
use std::path::{Path, PathBuf};

use map_pipeline::{PipelineError, PointSource, Result};
use ocean_common::{PointSet, Provenance};
use tracing::info;

/// Reads a JSON object with `observation`, `backward` and `forward` arrays of
/// flat sample records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointSource for JsonFileSource {
    fn load(&self) -> Result<PointSet> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            PipelineError::Source(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let points: PointSet = serde_json::from_str(&content).map_err(|e| {
            PipelineError::Source(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        info!(
            path = %self.path.display(),
            observation = points.partition(Provenance::Observation).len(),
            backward = points.partition(Provenance::Backward).len(),
            forward = points.partition(Provenance::Forward).len(),
            "Loaded point dump"
        );
        Ok(points)
    }
}
