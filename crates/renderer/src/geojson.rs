//! GeoJSON output for contour regions and point markers.
//!
//! Styling follows the simplestyle property names (`stroke`, `fill`,
//! `marker-color`, ...) that web map front ends understand without extra
//! configuration.

use serde::{Deserialize, Serialize};

use crate::contour::{ContourRegion, Polygon};
use crate::error::Result;
use crate::style::Color;

/// A single sample drawn as a colored dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub color: Color,
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// One MultiPolygon feature per region, in band order.
    pub fn from_regions(regions: &[ContourRegion]) -> Self {
        Self::new().with_features(regions.iter().map(Feature::from_region).collect())
    }

    /// One Point feature per marker.
    pub fn from_markers(markers: &[PointMarker]) -> Self {
        Self::new().with_features(markers.iter().map(Feature::from_marker).collect())
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: Geometry,

    pub properties: Properties,
}

impl Feature {
    pub fn from_region(region: &ContourRegion) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::MultiPolygon {
                coordinates: region.polygons.clone(),
            },
            properties: Properties::region(region),
        }
    }

    pub fn from_marker(marker: &PointMarker) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::point(marker.longitude, marker.latitude),
            properties: Properties {
                marker_color: Some(marker.color),
                ..Properties::default()
            },
        }
    }
}

/// Geometry types emitted by the map output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Coordinates as [longitude, latitude].
    Point { coordinates: [f64; 2] },

    /// Polygons of closed rings; each polygon lists its exterior ring first.
    MultiPolygon { coordinates: Vec<Polygon> },
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: [lon, lat],
        }
    }
}

/// Simplestyle properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Properties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,

    #[serde(rename = "stroke-width", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,

    #[serde(rename = "stroke-opacity", skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,

    #[serde(rename = "fill-opacity", skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,

    #[serde(rename = "marker-color", skip_serializing_if = "Option::is_none")]
    pub marker_color: Option<Color>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Properties {
    fn region(region: &ContourRegion) -> Self {
        Self {
            stroke: Some(region.color),
            stroke_width: Some(region.stroke_width),
            stroke_opacity: Some(1.0),
            fill: Some(region.color),
            fill_opacity: Some(region.fill_opacity),
            marker_color: None,
            title: Some(format!("{:.2}-{:.2}", region.lower, region.upper)),
        }
    }
}
