//! Map styling and vector output for classified ocean data.
//!
//! Implements:
//! - Pivot-relative level classification with fixed palettes
//! - Filled contour bands with angle simplification
//! - GeoJSON serialization of contour regions and point markers
//! - Radar (multi-axis) diagram geometry

pub mod contour;
pub mod error;
pub mod geojson;
pub mod radar;
pub mod style;

pub use contour::{extract, ContourRegion, ContourStyle};
pub use error::{RenderError, Result};
pub use geojson::{FeatureCollection, PointMarker};
pub use style::{classify, Color, LevelSet, Legend, PivotPlacement};
