//! File sinks for one rendered request.
//!
//! Each draw call replaces its artifact in the output directory:
//! `map.geojson`, `legend.json` and `diagram.json`. Clearing removes the
//! artifact so no file describes an earlier window.

use std::fs;
use std::path::{Path, PathBuf};

use map_pipeline::{Diagram, DiagramSink, PipelineError, RenderSink, Result, Side, Statistic};
use renderer::{radar, Color, ContourRegion, FeatureCollection, Legend, PointMarker};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MAP_FILE: &str = "map.geojson";
pub const LEGEND_FILE: &str = "legend.json";
pub const DIAGRAM_FILE: &str = "diagram.json";

/// Radar chart geometry in unit coordinates, ready for a plotting frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPlot {
    pub title: String,
    pub axes: Vec<String>,
    /// Axis angles in radians, first axis on top.
    pub angles: Vec<f64>,
    pub frame: Vec<[f64; 2]>,
    pub patches: Vec<RadarPatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPatch {
    pub statistic: Statistic,
    pub side: Side,
    pub color: Color,
    pub line_width: f64,
    pub fill_alpha: f64,
    /// `None` where the aggregate is undefined (empty subset, zero maximum).
    pub values: Vec<Option<f64>>,
    /// Closed outline; empty when any value is undefined.
    pub outline: Vec<[f64; 2]>,
}

impl RadarPlot {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let n = diagram.axes.len();
        let patches = diagram
            .series
            .iter()
            .map(|series| {
                let defined = series.values.iter().all(|v| v.is_finite());
                RadarPatch {
                    statistic: series.statistic,
                    side: series.side,
                    color: series.color,
                    line_width: series.line_width,
                    fill_alpha: series.fill_alpha,
                    values: series
                        .values
                        .iter()
                        .map(|v| v.is_finite().then_some(*v))
                        .collect(),
                    outline: if defined {
                        radar::patch(&series.values)
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect();

        Self {
            title: format!("{} split at {}", diagram.channel.axis_label(), diagram.pivot),
            axes: diagram.axes.clone(),
            angles: radar::axis_angles(n),
            frame: radar::frame(n),
            patches,
        }
    }
}

/// Writes every artifact into one directory.
#[derive(Debug, Clone)]
pub struct FileSinks {
    dir: PathBuf,
}

impl FileSinks {
    /// Create the sink, creating `dir` if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            PipelineError::Sink(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, content).map_err(|e| {
            PipelineError::Sink(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote artifact");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Removed artifact");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::Sink(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| PipelineError::Sink(format!("Failed to encode {}: {}", name, e)))?;
        self.write(name, &json)
    }
}

impl RenderSink for FileSinks {
    fn draw_regions(&mut self, regions: &[ContourRegion]) -> Result<()> {
        let json = FeatureCollection::from_regions(regions).to_json_pretty()?;
        self.write(MAP_FILE, &json)
    }

    fn draw_markers(&mut self, markers: &[PointMarker]) -> Result<()> {
        let json = FeatureCollection::from_markers(markers).to_json_pretty()?;
        self.write(MAP_FILE, &json)
    }

    fn draw_legend(&mut self, legend: &Legend) -> Result<()> {
        self.write_json(LEGEND_FILE, legend)
    }

    fn clear_legend(&mut self) -> Result<()> {
        self.remove(LEGEND_FILE)
    }
}

impl DiagramSink for FileSinks {
    fn draw_diagram(&mut self, diagram: &Diagram) -> Result<()> {
        self.write_json(DIAGRAM_FILE, &RadarPlot::from_diagram(diagram))
    }

    fn clear_diagram(&mut self) -> Result<()> {
        self.remove(DIAGRAM_FILE)
    }
}
