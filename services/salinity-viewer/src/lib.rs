//! Salinity viewer service library.
//!
//! File-backed collaborators for the map pipeline: a JSON point dump as the
//! point source and an output directory as render and diagram sink.

pub mod config;
pub mod output;
pub mod source;
