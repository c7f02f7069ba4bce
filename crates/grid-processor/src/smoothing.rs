//! Gaussian smoothing of interpolated grids.
//!
//! Separable isotropic blur: one 1-D pass along the rows axis, one along the
//! columns axis, each padding with zeros past the grid edge. Undefined (NaN)
//! nodes spread to every node within the kernel radius.

use ocean_common::Grid;
use tracing::debug;

use crate::error::{GridProcessorError, Result};

/// Kernel half-width in standard deviations.
pub const TRUNCATE: f64 = 4.0;

/// Normalized 1-D Gaussian weights of radius `floor(truncate * sigma + 0.5)`.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as usize;
    let inv_two_var = 0.5 / (sigma * sigma);

    let mut weights: Vec<f64> = (0..=2 * radius)
        .map(|k| {
            let x = k as f64 - radius as f64;
            (-x * x * inv_two_var).exp()
        })
        .collect();

    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Blur `grid` with standard deviation `sigma` (in grid steps) on both axes.
///
/// `sigma == 0` returns an unchanged copy.
pub fn smooth(grid: &Grid, sigma: f64) -> Result<Grid> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(GridProcessorError::InvalidSmoothing(sigma));
    }
    if sigma == 0.0 || grid.values().is_empty() {
        return Ok(grid.clone());
    }

    let kernel = gaussian_kernel(sigma, TRUNCATE);
    let width = grid.width();
    let height = grid.height();

    let mut out = grid.clone();
    let mut line = Vec::with_capacity(width.max(height));

    // Along the rows axis (latitude)
    for i in 0..width {
        line.clear();
        line.extend((0..height).map(|j| grid.values()[j * width + i]));
        let blurred = correlate_line(&line, &kernel);
        for (j, v) in blurred.into_iter().enumerate() {
            out.values_mut()[j * width + i] = v;
        }
    }

    // Along the columns axis (longitude)
    for j in 0..height {
        let row = &out.values()[j * width..(j + 1) * width];
        let blurred = correlate_line(row, &kernel);
        out.values_mut()[j * width..(j + 1) * width].copy_from_slice(&blurred);
    }

    debug!(
        sigma = sigma,
        radius = kernel.len() / 2,
        valid_nodes = out.valid_count(),
        "Smoothed grid"
    );

    Ok(out)
}

/// 1-D correlation with zero padding outside `input`.
fn correlate_line(input: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = input.len() as isize;
    let radius = (kernel.len() / 2) as isize;

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .filter_map(|(k, w)| {
                    let src = i + k as isize - radius;
                    (0..n).contains(&src).then(|| w * input[src as usize])
                })
                .sum()
        })
        .collect()
}
