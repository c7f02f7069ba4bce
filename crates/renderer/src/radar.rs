//! Radar (multi-axis) diagram geometry.
//!
//! All coordinates live in a unit square: the frame is the regular polygon
//! inscribed in the circle of radius 0.5 around (0.5, 0.5), one vertex per
//! axis, first axis on top and the rest counter-clockwise.

use std::f64::consts::{FRAC_PI_2, PI};

/// Center of the diagram on both axes, also the frame radius.
pub const CENTER: f64 = 0.5;

/// Radial offset so that a zero value is still visible.
pub const PATCH_OFFSET: f64 = 0.01;

/// Angle of each of `n` axes, evenly spaced, starting at the top.
pub fn axis_angles(n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| 2.0 * PI * k as f64 / n as f64 + FRAC_PI_2)
        .collect()
}

/// Closed outline of the diagram for `n` axes.
pub fn frame(n: usize) -> Vec<[f64; 2]> {
    close(
        axis_angles(n)
            .into_iter()
            .map(|t| [CENTER * t.cos() + CENTER, CENTER * t.sin() + CENTER])
            .collect(),
    )
}

/// Closed outline of one data series, one normalized value per axis.
///
/// Non-finite values yield non-finite coordinates; they are not clamped.
pub fn patch(values: &[f64]) -> Vec<[f64; 2]> {
    close(
        axis_angles(values.len())
            .into_iter()
            .zip(values)
            .map(|(t, r)| {
                let radius = r * CENTER + PATCH_OFFSET;
                [radius * t.cos() + CENTER, radius * t.sin() + CENTER]
            })
            .collect(),
    )
}

fn close(mut ring: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }
    ring
}
