//! Test data generators for creating synthetic drifter data.
//!
//! These generators create predictable, verifiable sample sets that can be
//! used across the test suite. Random placement is always seeded.

use chrono::Duration;
use ocean_common::{Channel, ChannelValues, PointSample, PointSet, TimeKey};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fixtures::bbox::GERMAN_BIGHT;

/// Smooth salinity-like field: fresher towards the coast (east/south),
/// roughly 20 to 34 PSU across the German Bight box.
pub fn salinity_field(lon: f64, lat: f64) -> f64 {
    let (min_lon, min_lat, max_lon, max_lat) = GERMAN_BIGHT;
    let fx = ((lon - min_lon) / (max_lon - min_lon)).clamp(0.0, 1.0);
    let fy = ((lat - min_lat) / (max_lat - min_lat)).clamp(0.0, 1.0);
    let ripple = (fx * std::f64::consts::PI * 3.0).sin() * (fy * std::f64::consts::PI * 2.0).cos();
    34.0 - 10.0 * fx + 2.0 * fy - 2.0 * ripple
}

/// All seven channels for a location; channel 1 follows [`salinity_field`].
pub fn channel_values(lon: f64, lat: f64) -> ChannelValues {
    let salinity = salinity_field(lon, lat);
    let mut values = ChannelValues::missing();
    for channel in Channel::ALL {
        values[channel] = match channel {
            Channel::Salinity => salinity,
            other => salinity * 0.1 * other.id() as f64 + lat - 54.0,
        };
    }
    values
}

/// A sample with only the salinity channel set.
pub fn salinity_sample(lon: f64, lat: f64, time: TimeKey, salinity: f64) -> PointSample {
    let mut values = ChannelValues::missing();
    values[Channel::Salinity] = salinity;
    PointSample::new(lat, lon, time, values)
}

/// `count` keys spaced `step_minutes` apart starting at `start`.
pub fn minute_keys(start: TimeKey, count: usize, step_minutes: i64) -> Vec<TimeKey> {
    let start = start.to_datetime().expect("valid start key");
    (0..count)
        .map(|n| {
            let dt = start + Duration::minutes(n as i64 * step_minutes);
            TimeKey::from_datetime(&dt).expect("generated key in range")
        })
        .collect()
}

/// `count` samples at random positions in the German Bight, spread evenly
/// across the 24 hours after `day_start`, with labels `first_label..`.
pub fn scattered_samples(count: usize, seed: u64, day_start: TimeKey, first_label: u64) -> Vec<PointSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (min_lon, min_lat, max_lon, max_lat) = GERMAN_BIGHT;
    let step = (24 * 60 / count.max(1)).max(1) as i64;
    let times = minute_keys(day_start, count, step);

    times
        .into_iter()
        .enumerate()
        .map(|(n, time)| {
            let lon = rng.gen_range(min_lon..max_lon);
            let lat = rng.gen_range(min_lat..max_lat);
            PointSample::new(lat, lon, time, channel_values(lon, lat)).with_label(first_label + n as u64)
        })
        .collect()
}

/// A three-provenance set for one day.
///
/// Observations carry labels `0..observations` and full channel values.
/// Derived rows reference observation labels round-robin and carry no
/// channel values, as they arrive before the label join.
pub fn synthetic_point_set(observations: usize, derived: usize, seed: u64, day_start: TimeKey) -> PointSet {
    let observation = scattered_samples(observations, seed, day_start, 0);

    let derive = |offset: u64| -> Vec<PointSample> {
        let mut rows = scattered_samples(derived, seed + offset, day_start, 0);
        for (n, row) in rows.iter_mut().enumerate() {
            row.values = ChannelValues::missing();
            row.label = Some((n % observations.max(1)) as u64);
        }
        rows
    };

    PointSet::new(observation, derive(1), derive(2))
}
