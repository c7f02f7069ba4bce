//! Pivot-relative level classification.
//!
//! A caller-chosen pivot (e.g. a salinity threshold) decides where the color
//! buckets sit. Values below the pivot get warm colors, values above it cool
//! ones, and the breakpoints are weighted so the range close to the pivot is
//! split more finely:
//!
//! | pivot position       | breakpoints                                          | palette        |
//! |----------------------|------------------------------------------------------|----------------|
//! | `pivot < vmin`       | `vmin, vmin + 0.3 (vmax - vmin), vmax`               | cool           |
//! | `pivot > vmax`       | `vmin, vmin + 0.7 (vmax - vmin), vmax`               | warm           |
//! | `vmin <= pivot <= vmax` | `vmin, vmin + 0.7 (p - vmin), p, p + 0.3 (vmax - p), vmax` | warm to cool |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Share of a sub-range placed below the inner breakpoint on the low side.
pub const LOWER_WEIGHT: f64 = 0.7;
/// Share of a sub-range placed below the inner breakpoint on the high side.
pub const UPPER_WEIGHT: f64 = 0.3;

/// Fixed palettes, darkest color at the outer end.
pub mod palette {
    /// Everything sits above the pivot.
    pub const COOL: [&str; 2] = ["#77b5d4", "#06618f"];
    /// Everything sits below the pivot.
    pub const WARM: [&str; 2] = ["#b5212f", "#de7881"];
    /// The pivot splits the observed range.
    pub const WARM_TO_COOL: [&str; 4] = ["#b5212f", "#de7881", "#77b5d4", "#06618f"];
}

/// An opaque RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(RenderError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| RenderError::InvalidColor(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(s: String) -> Result<Self> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_hex()
    }
}

fn palette_colors(hexes: &[&str]) -> Vec<Color> {
    hexes
        .iter()
        .filter_map(|h| Color::from_hex(h).ok())
        .collect()
}

/// Where the pivot fell relative to the observed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotPlacement {
    BelowRange,
    AboveRange,
    WithinRange,
}

/// Ordered breakpoints with one color per interval between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    breakpoints: Vec<f64>,
    colors: Vec<Color>,
}

impl LevelSet {
    /// Build a level set, checking `colors.len() == breakpoints.len() - 1`,
    /// at least three breakpoints, and non-decreasing order.
    pub fn new(breakpoints: Vec<f64>, colors: Vec<Color>) -> Result<Self> {
        let ordered = breakpoints.windows(2).all(|w| w[0] <= w[1]);
        if breakpoints.len() < 3 || colors.len() + 1 != breakpoints.len() || !ordered {
            return Err(RenderError::InvalidLevelSet {
                breakpoints: breakpoints.len(),
                colors: colors.len(),
            });
        }
        Ok(Self {
            breakpoints,
            colors,
        })
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of intervals (and colors).
    pub fn interval_count(&self) -> usize {
        self.colors.len()
    }

    /// `(lower, upper, color)` for each interval, in order.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64, Color)> + '_ {
        self.breakpoints
            .windows(2)
            .zip(self.colors.iter())
            .map(|(w, c)| (w[0], w[1], *c))
    }

    /// Index of the first interval whose closed range contains `value`.
    ///
    /// Ties resolve to the lower interval, so when every breakpoint is equal
    /// all matching values land in interval 0. Values outside the outer
    /// breakpoints (or NaN) return `None`.
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        self.breakpoints
            .windows(2)
            .position(|w| w[0] <= value && value <= w[1])
    }

    /// Color for a value, if it falls inside the classified range.
    pub fn color_of(&self, value: f64) -> Option<Color> {
        self.bucket_of(value).map(|i| self.colors[i])
    }

    pub fn min(&self) -> f64 {
        self.breakpoints[0]
    }

    pub fn max(&self) -> f64 {
        self.breakpoints[self.breakpoints.len() - 1]
    }
}

/// Derive breakpoints and colors for `values` around `pivot`.
///
/// A single distinct value produces equal breakpoints rather than an error.
pub fn classify(values: &[f64], pivot: f64) -> Result<LevelSet> {
    if !pivot.is_finite() {
        return Err(RenderError::NonFinite {
            what: "pivot",
            value: pivot,
        });
    }

    let mut iter = values.iter().copied();
    let first = iter.next().ok_or(RenderError::EmptyValues)?;
    let (vmin, vmax) = iter.try_fold((first, first), |(lo, hi), v| {
        if v.is_finite() {
            Ok((lo.min(v), hi.max(v)))
        } else {
            Err(RenderError::NonFinite {
                what: "value",
                value: v,
            })
        }
    })?;
    if !first.is_finite() {
        return Err(RenderError::NonFinite {
            what: "value",
            value: first,
        });
    }

    let (breakpoints, colors) = match placement(vmin, vmax, pivot) {
        PivotPlacement::BelowRange => (
            vec![vmin, vmin + UPPER_WEIGHT * (vmax - vmin), vmax],
            palette_colors(&palette::COOL),
        ),
        PivotPlacement::AboveRange => (
            vec![vmin, vmin + LOWER_WEIGHT * (vmax - vmin), vmax],
            palette_colors(&palette::WARM),
        ),
        PivotPlacement::WithinRange => (
            vec![
                vmin,
                vmin + LOWER_WEIGHT * (pivot - vmin),
                pivot,
                pivot + UPPER_WEIGHT * (vmax - pivot),
                vmax,
            ],
            palette_colors(&palette::WARM_TO_COOL),
        ),
    };

    LevelSet::new(breakpoints, colors)
}

/// Which of the three classification cases applies.
pub fn placement(vmin: f64, vmax: f64, pivot: f64) -> PivotPlacement {
    if pivot < vmin {
        PivotPlacement::BelowRange
    } else if pivot > vmax {
        PivotPlacement::AboveRange
    } else {
        PivotPlacement::WithinRange
    }
}

/// Legend handed to the render sink alongside a map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub caption: String,
    pub breakpoints: Vec<f64>,
    pub colors: Vec<Color>,
}

impl Legend {
    pub fn new(caption: impl Into<String>, levels: &LevelSet) -> Self {
        Self {
            caption: caption.into(),
            breakpoints: levels.breakpoints().to_vec(),
            colors: levels.colors().to_vec(),
        }
    }
}
