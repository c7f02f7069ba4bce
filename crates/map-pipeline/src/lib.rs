//! Time-windowed classification and contour pipeline.
//!
//! One request selects the samples of a time window, classifies them around a
//! pivot and produces either filled contour regions or colored point markers,
//! plus a comparative multi-channel diagram.
//!
//! # Architecture
//!
//! ```text
//! PointSource ─► augment_derived ─► ChannelStats (once)
//!                      │
//!    Request ─► select(window)
//!                      │
//!          ┌───────────┼────────────────────┐
//!          ▼           ▼                    ▼
//!      classify    interpolate/smooth    build_diagram
//!          │           │                    │
//!          ├──► extract (contours)          │
//!          └──► reduce + bucket (points)    │
//!                      │                    │
//!                 RenderSink           DiagramSink
//! ```
//!
//! The pipeline holds configuration only. Everything a request produces is
//! rebuilt from its inputs, so repeating a request yields identical output.

pub mod augment;
pub mod config;
pub mod diagram;
pub mod error;
pub mod pipeline;
pub mod select;
pub mod sinks;

pub use augment::{augment_derived, join_labels};
pub use config::PipelineConfig;
pub use diagram::{build_diagram, Diagram, DiagramSeries, Side, Statistic};
pub use error::{PipelineError, Result};
pub use pipeline::{DisplayMode, MapLayer, Outcome, Pipeline, Request};
pub use select::select;
pub use sinks::{DiagramSink, PointSource, RenderSink};
