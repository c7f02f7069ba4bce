//! Viewer configuration.
//!
//! Layered as YAML file, then environment, then command line (applied by the
//! binary).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use map_pipeline::PipelineConfig;
use ocean_common::TimeBounds;
use serde::{Deserialize, Serialize};

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// JSON point dump with `observation`, `backward` and `forward` arrays
    pub data_path: PathBuf,

    /// Directory receiving map.geojson, legend.json and diagram.json
    pub output_dir: PathBuf,

    /// Request defaults and processing knobs
    pub pipeline: PipelineConfig,

    /// Window starts the dataset covers
    pub time_bounds: TimeBounds,

    /// Initial map view as (lat, lon)
    pub map_center: (f64, f64),

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/points.json"),
            output_dir: PathBuf::from("output"),
            pipeline: PipelineConfig::default(),
            time_bounds: TimeBounds::default(),
            map_center: (54.12, 8.37),
            logging: LoggingConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load from `path` when given, otherwise start from defaults; then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self {
                pipeline: PipelineConfig::from_env(),
                ..Self::default()
            },
        };
        config.apply_env(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML file. Missing keys keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read viewer config from {:?}", path.as_ref()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse viewer config {:?}", path.as_ref()))
    }

    /// Apply `VIEWER_*`, `GRID_RESOLUTION` and `TARGET_POINTS` overrides.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("VIEWER_DATA_PATH") {
            self.data_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("VIEWER_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("VIEWER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(val) = lookup("GRID_RESOLUTION") {
            self.pipeline.grid.resolution = val
                .parse()
                .with_context(|| format!("GRID_RESOLUTION is not a count: {}", val))?;
        }
        if let Some(val) = lookup("TARGET_POINTS") {
            self.pipeline.grid.target_points = val
                .parse()
                .with_context(|| format!("TARGET_POINTS is not a count: {}", val))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        if self.time_bounds.min > self.time_bounds.max {
            bail!(
                "time_bounds.min ({}) is after time_bounds.max ({})",
                self.time_bounds.min,
                self.time_bounds.max
            );
        }
        Ok(())
    }
}
