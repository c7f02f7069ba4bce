//! Point samples and provenance-partitioned point sets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelValues, CHANNEL_COUNT};
use crate::time::TimeKey;

/// Where a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Direct drifter observation.
    Observation,
    /// Backward-in-time extrapolation.
    Backward,
    /// Forward-in-time extrapolation.
    Forward,
}

impl Provenance {
    pub const ALL: [Provenance; 3] = [
        Provenance::Observation,
        Provenance::Backward,
        Provenance::Forward,
    ];

    pub fn is_derived(&self) -> bool {
        !matches!(self, Provenance::Observation)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provenance::Observation => "observation",
            Provenance::Backward => "backward",
            Provenance::Forward => "forward",
        };
        f.write_str(name)
    }
}

/// One located, timestamped sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SampleRecord")]
pub struct PointSample {
    pub latitude: f64,
    pub longitude: f64,
    pub time: TimeKey,
    /// Identifier shared between an observation and the samples derived from it.
    pub label: Option<u64>,
    pub values: ChannelValues,
}

impl PointSample {
    pub fn new(latitude: f64, longitude: f64, time: TimeKey, values: ChannelValues) -> Self {
        Self {
            latitude,
            longitude,
            time,
            label: None,
            values,
        }
    }

    pub fn with_label(mut self, label: u64) -> Self {
        self.label = Some(label);
        self
    }

    pub fn value(&self, channel: Channel) -> f64 {
        self.values.get(channel)
    }
}

/// Flat record layout used by point dumps (`sensor_1` .. `sensor_7` columns,
/// any of which may be null or absent).
#[derive(Debug, Deserialize)]
struct SampleRecord {
    latitude: f64,
    longitude: f64,
    #[serde(alias = "initial_time")]
    time: TimeKey,
    #[serde(default)]
    label: Option<u64>,
    #[serde(default)]
    sensor_1: Option<f64>,
    #[serde(default)]
    sensor_2: Option<f64>,
    #[serde(default)]
    sensor_3: Option<f64>,
    #[serde(default)]
    sensor_4: Option<f64>,
    #[serde(default)]
    sensor_5: Option<f64>,
    #[serde(default)]
    sensor_6: Option<f64>,
    #[serde(default)]
    sensor_7: Option<f64>,
}

impl From<SampleRecord> for PointSample {
    fn from(record: SampleRecord) -> Self {
        let raw: [Option<f64>; CHANNEL_COUNT] = [
            record.sensor_1,
            record.sensor_2,
            record.sensor_3,
            record.sensor_4,
            record.sensor_5,
            record.sensor_6,
            record.sensor_7,
        ];
        let mut values = ChannelValues::missing();
        for (channel, value) in Channel::ALL.iter().zip(raw) {
            if let Some(v) = value {
                values[*channel] = v;
            }
        }

        PointSample {
            latitude: record.latitude,
            longitude: record.longitude,
            time: record.time,
            label: record.label,
            values,
        }
    }
}

/// Samples partitioned by provenance. Each partition keeps its source order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PointSet {
    #[serde(default)]
    pub observation: Vec<PointSample>,
    #[serde(default)]
    pub backward: Vec<PointSample>,
    #[serde(default)]
    pub forward: Vec<PointSample>,
}

impl PointSet {
    pub fn new(
        observation: Vec<PointSample>,
        backward: Vec<PointSample>,
        forward: Vec<PointSample>,
    ) -> Self {
        Self {
            observation,
            backward,
            forward,
        }
    }

    pub fn partition(&self, provenance: Provenance) -> &[PointSample] {
        match provenance {
            Provenance::Observation => &self.observation,
            Provenance::Backward => &self.backward,
            Provenance::Forward => &self.forward,
        }
    }

    pub fn partition_mut(&mut self, provenance: Provenance) -> &mut Vec<PointSample> {
        match provenance {
            Provenance::Observation => &mut self.observation,
            Provenance::Backward => &mut self.backward,
            Provenance::Forward => &mut self.forward,
        }
    }

    /// Concatenation of observation, backward and forward samples.
    pub fn union(&self) -> impl Iterator<Item = &PointSample> + '_ {
        self.observation
            .iter()
            .chain(self.backward.iter())
            .chain(self.forward.iter())
    }

    pub fn len(&self) -> usize {
        self.observation.len() + self.backward.len() + self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
