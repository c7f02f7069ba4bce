//! Process-wide per-channel statistics and the channel normalizer.
//!
//! [`ChannelStats`] is computed once from the full multi-provenance dataset and
//! then passed by reference into every request. Nothing mutates it afterwards.

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, CHANNEL_COUNT};
use crate::sample::PointSample;

/// Min/max/sum accumulator that ignores NaN readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningStats {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn push(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Minimum, or NaN when nothing was pushed.
    pub fn min(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.min }
    }

    /// Maximum, or NaN when nothing was pushed.
    pub fn max(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.max }
    }

    /// Arithmetic mean, or NaN when nothing was pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Global bounds of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    /// Smallest reading, floored at zero.
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Smallest reading as observed, before flooring.
    pub observed_min: f64,
}

impl ChannelSummary {
    fn from_running(stats: &RunningStats) -> Self {
        let observed_min = stats.min();
        Self {
            min: if observed_min.is_nan() { f64::NAN } else { observed_min.max(0.0) },
            max: stats.max(),
            mean: stats.mean(),
            observed_min,
        }
    }
}

/// Global per-channel bounds over every provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    summaries: [ChannelSummary; CHANNEL_COUNT],
    sample_count: usize,
}

impl ChannelStats {
    /// Reduce every sample once, accumulating all seven channels.
    pub fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a PointSample>,
    {
        let mut running = [RunningStats::new(); CHANNEL_COUNT];
        let mut sample_count = 0;
        for sample in samples {
            sample_count += 1;
            for (acc, value) in running.iter_mut().zip(sample.values.0.iter()) {
                acc.push(*value);
            }
        }

        let summaries = running.map(|acc| ChannelSummary::from_running(&acc));
        Self {
            summaries,
            sample_count,
        }
    }

    pub fn summary(&self, channel: Channel) -> &ChannelSummary {
        &self.summaries[channel.index()]
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Integer range offered for the pivot control: `floor(min)..=ceil(max)`
    /// over the unfloored readings.
    pub fn pivot_range(&self, channel: Channel) -> (f64, f64) {
        let summary = self.summary(channel);
        (summary.observed_min.floor(), summary.max.ceil())
    }

    /// Normalize a subset aggregate of `channel` against its global bounds.
    pub fn normalize(&self, channel: Channel, value: f64) -> f64 {
        normalize(value, self.summary(channel))
    }
}

/// Scale a subset aggregate for the comparative diagram:
/// `(value - min) / max`.
///
/// The divisor is the global maximum, not the range. A zero maximum yields an
/// infinite or NaN result which is passed on unchanged.
pub fn normalize(value: f64, summary: &ChannelSummary) -> f64 {
    (value - summary.min) / summary.max
}
