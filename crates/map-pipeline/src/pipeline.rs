//! Request orchestration.
//!
//! [`Pipeline::update`] runs one request to completion: select the window,
//! classify the chosen channel around the pivot, build the map layer and the
//! comparative diagram. [`Pipeline::render`] hands the result to the sinks.

use std::time::Instant;

use grid_processor::{interpolate, reduce, smooth, GridProcessorError, ScatteredPoint};
use ocean_common::{Channel, ChannelStats, PointSample, PointSet, TimeWindow};
use renderer::{classify, extract, ContourRegion, LevelSet, Legend, PointMarker, RenderError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::diagram::{build_diagram, Diagram};
use crate::error::Result;
use crate::select::select;
use crate::sinks::{DiagramSink, RenderSink};

/// How the classified values are drawn on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Filled contour bands over the interpolated grid.
    #[default]
    Contour,
    /// One colored marker per (downsampled) sample.
    Points,
}

/// Everything one update depends on besides the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub window: TimeWindow,
    pub pivot: f64,
    /// Gaussian sigma in grid steps, 0 disables smoothing.
    pub smoothing: f64,
    pub mode: DisplayMode,
    pub channel: Channel,
}

impl Request {
    /// A request for `window` using the configured defaults.
    pub fn new(window: TimeWindow, config: &PipelineConfig) -> Self {
        Self {
            window,
            pivot: config.pivot,
            smoothing: config.smoothing,
            mode: DisplayMode::default(),
            channel: config.channel,
        }
    }

    pub fn with_pivot(mut self, pivot: f64) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject a non-finite pivot and a negative or non-finite smoothing
    /// strength.
    pub fn validate(&self) -> Result<()> {
        if !self.pivot.is_finite() {
            return Err(RenderError::NonFinite {
                what: "pivot",
                value: self.pivot,
            }
            .into());
        }
        if !self.smoothing.is_finite() || self.smoothing < 0.0 {
            return Err(GridProcessorError::InvalidSmoothing(self.smoothing).into());
        }
        Ok(())
    }
}

/// The map content of one outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapLayer {
    /// Nothing to draw: no sample in the window has a value for the channel.
    Empty,
    /// Contour regions in band order.
    Contours(Vec<ContourRegion>),
    /// Markers grouped by band order.
    Points(Vec<PointMarker>),
}

impl MapLayer {
    pub fn is_empty(&self) -> bool {
        match self {
            MapLayer::Empty => true,
            MapLayer::Contours(regions) => regions.is_empty(),
            MapLayer::Points(markers) => markers.is_empty(),
        }
    }
}

/// Result of one update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub window: TimeWindow,
    /// Samples selected across all provenances.
    pub selected: usize,
    pub layer: MapLayer,
    /// Present whenever the layer was classified.
    pub legend: Option<Legend>,
    /// Present whenever the selection has a value for the channel.
    pub diagram: Option<Diagram>,
}

/// Stateless request processor.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Serve one request against the full dataset and its global statistics.
    pub fn update(&self, points: &PointSet, stats: &ChannelStats, request: &Request) -> Result<Outcome> {
        request.validate()?;
        let start = Instant::now();
        let selection = select(points, &request.window)?;

        let valid: Vec<&PointSample> = selection
            .union()
            .filter(|s| !s.value(request.channel).is_nan())
            .collect();

        if valid.is_empty() {
            debug!(
                window = %request.window,
                selected = selection.len(),
                "No values in window"
            );
            return Ok(Outcome {
                window: request.window,
                selected: selection.len(),
                layer: MapLayer::Empty,
                legend: None,
                diagram: None,
            });
        }

        let column: Vec<f64> = valid.iter().map(|s| s.value(request.channel)).collect();
        let levels = classify(&column, request.pivot)?;

        let layer = match request.mode {
            DisplayMode::Contour => MapLayer::Contours(self.contours(&valid, &levels, request)?),
            DisplayMode::Points => MapLayer::Points(self.markers(valid, &levels, request.channel)),
        };

        let diagram = build_diagram(selection.union(), stats, request.channel, request.pivot);

        debug!(
            window = %request.window,
            channel = %request.channel,
            pivot = request.pivot,
            selected = selection.len(),
            valid = column.len(),
            bands = levels.interval_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Update complete"
        );

        Ok(Outcome {
            window: request.window,
            selected: selection.len(),
            layer,
            legend: Some(Legend::new(request.channel.caption(), &levels)),
            diagram: Some(diagram),
        })
    }

    /// Hand an outcome to the sinks. An empty layer clears the map, the
    /// legend and the diagram.
    pub fn render(
        &self,
        outcome: &Outcome,
        map: &mut dyn RenderSink,
        diagram: &mut dyn DiagramSink,
    ) -> Result<()> {
        match &outcome.layer {
            MapLayer::Empty => map.draw_regions(&[])?,
            MapLayer::Contours(regions) => map.draw_regions(regions)?,
            MapLayer::Points(markers) => map.draw_markers(markers)?,
        }
        match &outcome.legend {
            Some(legend) => map.draw_legend(legend)?,
            None => map.clear_legend()?,
        }
        match &outcome.diagram {
            Some(d) => diagram.draw_diagram(d)?,
            None => diagram.clear_diagram()?,
        }
        Ok(())
    }

    fn contours(
        &self,
        samples: &[&PointSample],
        levels: &LevelSet,
        request: &Request,
    ) -> Result<Vec<ContourRegion>> {
        let scattered: Vec<ScatteredPoint> = samples
            .iter()
            .map(|s| ScatteredPoint::new(s.longitude, s.latitude, s.value(request.channel)))
            .collect();

        let grid = interpolate(&scattered, self.config.grid.resolution)?;
        let grid = smooth(&grid, request.smoothing)?;

        Ok(extract(&grid, levels, &self.config.contour))
    }

    /// Markers for a stride subsample, grouped by band, keeping sample order
    /// within a band.
    ///
    /// A value on an inner breakpoint gets the lower band's color only. An
    /// inclusive test per band would draw it once per adjacent band instead.
    fn markers(&self, samples: Vec<&PointSample>, levels: &LevelSet, channel: Channel) -> Vec<PointMarker> {
        let retained = reduce(samples, self.config.grid.target_points);

        let mut bucketed: Vec<(usize, PointMarker)> = retained
            .into_iter()
            .filter_map(|s| {
                let bucket = levels.bucket_of(s.value(channel))?;
                Some((
                    bucket,
                    PointMarker {
                        latitude: s.latitude,
                        longitude: s.longitude,
                        color: levels.colors()[bucket],
                    },
                ))
            })
            .collect();
        bucketed.sort_by_key(|(bucket, _)| *bucket);

        bucketed.into_iter().map(|(_, marker)| marker).collect()
    }
}
