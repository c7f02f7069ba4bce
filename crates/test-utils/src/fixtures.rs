//! Common test fixtures for salinity map tests.
//!
//! Pre-defined extents, times and records representing the German Bight
//! drifter campaign the viewer was built for.

use ocean_common::{ChannelSummary, TimeKey};

/// Common bounding boxes for testing, as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    /// German Bight, where the drifters were released
    pub const GERMAN_BIGHT: (f64, f64, f64, f64) = (7.8, 53.8, 8.9, 54.5);

    /// Single point (degenerate bbox)
    pub const POINT: (f64, f64, f64, f64) = (8.37, 54.12, 8.37, 54.12);
}

/// Default map center `(lat, lon)`.
pub const MAP_CENTER: (f64, f64) = (54.12, 8.37);

/// Salinity pivot the viewer starts with.
pub const DEFAULT_PIVOT: f64 = 25.0;

/// Key for a `YYYYMMDDhhmm` literal known to be valid.
pub fn key(raw: u64) -> TimeKey {
    TimeKey::from_raw(raw).expect("fixture time key must be valid")
}

/// 2013-06-01 00:00, the day the viewer opens on.
pub fn campaign_start() -> TimeKey {
    key(201306010000)
}

/// A channel summary with the given global bounds.
pub fn summary(min: f64, max: f64, mean: f64) -> ChannelSummary {
    ChannelSummary {
        min,
        max,
        mean,
        observed_min: min,
    }
}

/// One observation record in the flat dump layout.
pub const OBSERVATION_RECORD_JSON: &str = r#"{
    "latitude": 54.12, "longitude": 8.37, "time": "201306011200", "label": 1,
    "sensor_1": 31.2, "sensor_2": 14.5, "sensor_3": 8.1, "sensor_4": 0.4,
    "sensor_5": 2.2, "sensor_6": 1015.0, "sensor_7": 6.8
}"#;
