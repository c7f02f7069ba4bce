//! Common types and utilities shared across the salinity map crates.

pub mod bbox;
pub mod channel;
pub mod error;
pub mod grid;
pub mod sample;
pub mod stats;
pub mod time;

pub use bbox::BoundingBox;
pub use channel::{Channel, ChannelValues};
pub use error::{OceanError, OceanResult};
pub use grid::Grid;
pub use sample::{PointSample, PointSet, Provenance};
pub use stats::{normalize, ChannelStats, ChannelSummary, RunningStats};
pub use time::{TimeBounds, TimeKey, TimeWindow};
