//! Configuration for the grid processor.

use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

/// Sizing knobs for gridding and point reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Steps per axis of the interpolation mesh.
    pub resolution: usize,

    /// Upper bound on markers in the point display.
    pub target_points: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            resolution: 500,
            target_points: 2000,
        }
    }
}

impl GridConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                config.resolution = resolution;
            }
        }

        if let Ok(val) = std::env::var("TARGET_POINTS") {
            if let Ok(target) = val.parse() {
                config.target_points = target;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(GridProcessorError::InvalidResolution(self.resolution));
        }
        if self.target_points == 0 {
            return Err(GridProcessorError::ConfigError(
                "target_points must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
