//! Regular lon/lat grids holding interpolated channel values.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{OceanError, OceanResult};

/// A regular mesh over a bounding box.
///
/// Values are stored row-major: row `j` holds the nodes at latitude `ys[j]`,
/// column `i` the nodes at longitude `xs[i]`. Undefined nodes are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl Grid {
    /// Create a grid from axis coordinates and row-major values.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, values: Vec<f64>) -> OceanResult<Self> {
        let expected = xs.len() * ys.len();
        if values.len() != expected {
            return Err(OceanError::GridMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { xs, ys, values })
    }

    /// A grid with every node set to `value`.
    pub fn filled(xs: Vec<f64>, ys: Vec<f64>, value: f64) -> Self {
        let values = vec![value; xs.len() * ys.len()];
        Self { xs, ys, values }
    }

    /// `n` evenly spaced samples from `start` to `stop` inclusive.
    ///
    /// The last sample is exactly `stop`; `n == 1` yields `[start]`.
    pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (n - 1) as f64;
                let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
                out[n - 1] = stop;
                out
            }
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.xs.len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.ys.len()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Flat index of node `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.xs.len() + i
    }

    /// Value at column `i`, row `j`, or `None` if out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.width() || j >= self.height() {
            return None;
        }
        Some(self.values[self.index(i, j)])
    }

    /// Geographic position of node `(i, j)` as `(x, y)`.
    pub fn coord(&self, i: usize, j: usize) -> (f64, f64) {
        (self.xs[i], self.ys[j])
    }

    /// Extent of the mesh, if it has any nodes.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let (x0, x1) = (self.xs.first()?, self.xs.last()?);
        let (y0, y1) = (self.ys.first()?, self.ys.last()?);
        Some(BoundingBox::new(*x0, *y0, *x1, *y1))
    }

    /// Number of defined (non-NaN) nodes.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Min and max over defined nodes.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
