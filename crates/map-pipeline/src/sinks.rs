//! Collaborator seams: where samples come from and where results go.

use ocean_common::PointSet;
use renderer::{ContourRegion, Legend, PointMarker};

use crate::diagram::Diagram;
use crate::error::Result;

/// Loads the full three-provenance dataset.
pub trait PointSource {
    fn load(&self) -> Result<PointSet>;
}

/// Receives the map layer of one request.
pub trait RenderSink {
    /// Filled contour regions, in band order.
    fn draw_regions(&mut self, regions: &[ContourRegion]) -> Result<()>;

    /// Point markers, grouped by band.
    fn draw_markers(&mut self, markers: &[PointMarker]) -> Result<()>;

    fn draw_legend(&mut self, legend: &Legend) -> Result<()>;

    /// Remove the legend of an earlier request; called when nothing was
    /// classified.
    fn clear_legend(&mut self) -> Result<()>;
}

/// Receives the comparative diagram of one request.
pub trait DiagramSink {
    fn draw_diagram(&mut self, diagram: &Diagram) -> Result<()>;

    /// Remove the diagram of an earlier request.
    fn clear_diagram(&mut self) -> Result<()>;
}
