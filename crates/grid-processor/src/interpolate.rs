//! Linear interpolation of scattered samples onto a regular grid.
//!
//! The input points are Delaunay-triangulated; every mesh node inside a
//! triangle gets the barycentric blend of the triangle's three values. Nodes
//! outside the convex hull of the inputs stay NaN.

use std::time::Instant;

use delaunator::{triangulate, Point};
use ocean_common::{BoundingBox, Grid};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridProcessorError, Result};

/// Barycentric weights this far below zero still count as inside, so nodes
/// lying exactly on a hull edge are not lost to rounding.
const INSIDE_TOLERANCE: f64 = 1e-10;

/// A sample position with the value to interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatteredPoint {
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
    pub value: f64,
}

impl ScatteredPoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// Interpolate `points` onto a `resolution` x `resolution` mesh spanning their
/// bounding box.
///
/// An empty input yields an empty (0 x 0) grid. Inputs whose hull has no area
/// (fewer than three distinct points, or all collinear) yield a mesh whose
/// nodes are all NaN.
pub fn interpolate(points: &[ScatteredPoint], resolution: usize) -> Result<Grid> {
    if resolution < 2 {
        return Err(GridProcessorError::InvalidResolution(resolution));
    }

    for (index, p) in points.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.value.is_finite()) {
            return Err(GridProcessorError::NonFiniteInput {
                index,
                x: p.x,
                y: p.y,
                value: p.value,
            });
        }
    }

    let Some(bbox) = BoundingBox::from_points(points.iter().map(|p| (p.x, p.y))) else {
        return Ok(Grid::filled(Vec::new(), Vec::new(), f64::NAN));
    };

    let start = Instant::now();
    let xs = Grid::linspace(bbox.min_x, bbox.max_x, resolution);
    let ys = Grid::linspace(bbox.min_y, bbox.max_y, resolution);
    let mut grid = Grid::filled(xs, ys, f64::NAN);

    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        debug!(
            points = points.len(),
            "Degenerate extent, every grid node undefined"
        );
        return Ok(grid);
    }

    let vertices: Vec<Point> = points.iter().map(|p| Point { x: p.x, y: p.y }).collect();
    let triangulation = triangulate(&vertices);

    for tri in triangulation.triangles.chunks_exact(3) {
        rasterize_triangle(
            &mut grid,
            &bbox,
            [points[tri[0]], points[tri[1]], points[tri[2]]],
        );
    }

    debug!(
        points = points.len(),
        triangles = triangulation.triangles.len() / 3,
        resolution = resolution,
        valid_nodes = grid.valid_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Interpolated scattered points"
    );

    Ok(grid)
}

/// Fill every still-undefined node covered by one triangle.
fn rasterize_triangle(grid: &mut Grid, bbox: &BoundingBox, tri: [ScatteredPoint; 3]) {
    let [a, b, c] = tri;

    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() <= f64::EPSILON * bbox.width() * bbox.height() {
        return;
    }

    let width = grid.width();
    let height = grid.height();
    let dx = bbox.width() / (width - 1) as f64;
    let dy = bbox.height() / (height - 1) as f64;

    let (i0, i1) = node_span(
        a.x.min(b.x).min(c.x),
        a.x.max(b.x).max(c.x),
        bbox.min_x,
        dx,
        width,
    );
    let (j0, j1) = node_span(
        a.y.min(b.y).min(c.y),
        a.y.max(b.y).max(c.y),
        bbox.min_y,
        dy,
        height,
    );

    for j in j0..=j1 {
        let py = grid.ys()[j];
        for i in i0..=i1 {
            let idx = grid.index(i, j);
            if !grid.values()[idx].is_nan() {
                continue;
            }

            let px = grid.xs()[i];
            let l1 = ((b.y - c.y) * (px - c.x) + (c.x - b.x) * (py - c.y)) / det;
            let l2 = ((c.y - a.y) * (px - c.x) + (a.x - c.x) * (py - c.y)) / det;
            let l3 = 1.0 - l1 - l2;

            if l1 >= -INSIDE_TOLERANCE && l2 >= -INSIDE_TOLERANCE && l3 >= -INSIDE_TOLERANCE {
                grid.values_mut()[idx] = l1 * a.value + l2 * b.value + l3 * c.value;
            }
        }
    }
}

/// Inclusive range of node indices whose coordinate may fall in `[lo, hi]`.
///
/// Padded by one node on each side; the barycentric test does the exact cut.
fn node_span(lo: f64, hi: f64, origin: f64, step: f64, count: usize) -> (usize, usize) {
    let first = ((lo - origin) / step).floor() as i64 - 1;
    let last = ((hi - origin) / step).ceil() as i64 + 1;
    let max = count as i64 - 1;
    (first.clamp(0, max) as usize, last.clamp(0, max) as usize)
}
