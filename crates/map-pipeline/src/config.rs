//! Pipeline configuration.

use grid_processor::GridConfig;
use ocean_common::Channel;
use renderer::ContourStyle;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Request defaults and processing knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Mesh size and marker budget.
    pub grid: GridConfig,

    /// Contour presentation and simplification.
    pub contour: ContourStyle,

    /// Channel classified on the map.
    pub channel: Channel,

    /// Initial pivot value.
    pub pivot: f64,

    /// Gaussian smoothing strength in grid steps (0 = off).
    pub smoothing: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            contour: ContourStyle::default(),
            channel: Channel::Salinity,
            pivot: 25.0,
            smoothing: 0.0,
        }
    }
}

impl PipelineConfig {
    /// Defaults with grid sizing taken from the environment.
    pub fn from_env() -> Self {
        Self {
            grid: GridConfig::from_env(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;

        if !self.pivot.is_finite() {
            return Err(PipelineError::Config(format!(
                "pivot must be finite, got {}",
                self.pivot
            )));
        }
        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(PipelineError::Config(format!(
                "smoothing must be a non-negative number, got {}",
                self.smoothing
            )));
        }
        if !(0.0..=1.0).contains(&self.contour.fill_opacity) {
            return Err(PipelineError::Config(format!(
                "contour.fill_opacity must be within [0, 1], got {}",
                self.contour.fill_opacity
            )));
        }
        if self.contour.min_angle_deg < 0.0 || self.contour.ndigits > 15 {
            return Err(PipelineError::Config(
                "contour.min_angle_deg must be >= 0 and contour.ndigits <= 15".to_string(),
            ));
        }
        Ok(())
    }
}
