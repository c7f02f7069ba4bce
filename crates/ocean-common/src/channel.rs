//! Measurement channels.
//!
//! Each sample carries seven sensor channels; channel 1 is salinity.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{OceanError, OceanResult};

/// Number of measurement channels per sample.
pub const CHANNEL_COUNT: usize = 7;

/// One of the seven measured quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Salinity,
    Sensor2,
    Sensor3,
    Sensor4,
    Sensor5,
    Sensor6,
    Sensor7,
}

impl Channel {
    /// All channels in id order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Salinity,
        Channel::Sensor2,
        Channel::Sensor3,
        Channel::Sensor4,
        Channel::Sensor5,
        Channel::Sensor6,
        Channel::Sensor7,
    ];

    /// Look up a channel by its 1-based id.
    pub fn from_id(id: u8) -> OceanResult<Self> {
        match id {
            1..=7 => Ok(Self::ALL[(id - 1) as usize]),
            _ => Err(OceanError::UnknownChannel(id)),
        }
    }

    /// 1-based channel id as used in the source records (`sensor_<id>`).
    pub fn id(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// 0-based position in a [`ChannelValues`] array.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Column name in the source records.
    pub fn column_name(&self) -> String {
        format!("sensor_{}", self.id())
    }

    /// Legend caption for maps classified on this channel.
    pub fn caption(&self) -> String {
        match self {
            Channel::Salinity => "Salinity in PSU".to_string(),
            other => format!("Sensor {}", other.id()),
        }
    }

    /// Short axis label for the comparative diagram.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Channel::Salinity => "Salinity",
            Channel::Sensor2 => "Sensor 2",
            Channel::Sensor3 => "Sensor 3",
            Channel::Sensor4 => "Sensor 4",
            Channel::Sensor5 => "Sensor 5",
            Channel::Sensor6 => "Sensor 6",
            Channel::Sensor7 => "Sensor 7",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

/// Per-channel values of one sample. Missing readings are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelValues(pub [f64; CHANNEL_COUNT]);

impl ChannelValues {
    pub fn new(values: [f64; CHANNEL_COUNT]) -> Self {
        Self(values)
    }

    /// All channels missing.
    pub fn missing() -> Self {
        Self([f64::NAN; CHANNEL_COUNT])
    }

    pub fn get(&self, channel: Channel) -> f64 {
        self.0[channel.index()]
    }

    /// True when no channel has a reading.
    pub fn is_missing(&self) -> bool {
        self.0.iter().all(|v| v.is_nan())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        Channel::ALL.iter().map(move |&c| (c, self.0[c.index()]))
    }
}

impl Default for ChannelValues {
    fn default() -> Self {
        Self::missing()
    }
}

impl Index<Channel> for ChannelValues {
    type Output = f64;

    fn index(&self, channel: Channel) -> &f64 {
        &self.0[channel.index()]
    }
}

impl IndexMut<Channel> for ChannelValues {
    fn index_mut(&mut self, channel: Channel) -> &mut f64 {
        &mut self.0[channel.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ids_are_one_based() {
        assert_eq!(Channel::Salinity.id(), 1);
        assert_eq!(Channel::Sensor7.id(), 7);
        assert_eq!(Channel::from_id(1).unwrap(), Channel::Salinity);
        assert_eq!(Channel::from_id(4).unwrap(), Channel::Sensor4);
    }

    #[test]
    fn test_unknown_channel_ids() {
        assert!(Channel::from_id(0).is_err());
        assert!(Channel::from_id(8).is_err());
    }

    #[test]
    fn test_column_names() {
        assert_eq!(Channel::Salinity.column_name(), "sensor_1");
        assert_eq!(Channel::Sensor6.to_string(), "sensor_6");
    }

    #[test]
    fn test_values_indexing() {
        let mut values = ChannelValues::missing();
        assert!(values.is_missing());
        values[Channel::Sensor3] = 4.5;
        assert_eq!(values.get(Channel::Sensor3), 4.5);
        assert!(!values.is_missing());
        assert!(values.get(Channel::Salinity).is_nan());
    }
}
