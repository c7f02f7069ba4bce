//! Grid processing for scattered ocean samples.
//!
//! Turns irregularly placed `(longitude, latitude, value)` triples into a
//! regular [`Grid`](ocean_common::Grid) and reduces oversized point sets for
//! marker display.
//!
//! # Architecture
//!
//! ```text
//! selected samples
//!      │
//!      ├─► interpolate(points, resolution)   Delaunay + barycentric weights
//!      │         │
//!      │         └─► smooth(grid, sigma)     separable Gaussian, zero padding
//!      │                   │
//!      │                   ▼
//!      │              contour extraction (renderer)
//!      │
//!      └─► reduce(points, target_size)       fixed-stride subsampling
//!                │
//!                ▼
//!           point markers (renderer)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{interpolate, smooth, ScatteredPoint};
//!
//! let grid = interpolate(&points, 500)?;
//! let grid = smooth(&grid, 2.0)?;
//! ```

pub mod config;
pub mod downsample;
pub mod error;
pub mod interpolate;
pub mod smoothing;

pub use config::GridConfig;
pub use downsample::reduce;
pub use error::{GridProcessorError, Result};
pub use interpolate::{interpolate, ScatteredPoint};
pub use smoothing::{gaussian_kernel, smooth};
