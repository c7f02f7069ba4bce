//! Comparative multi-channel diagram.
//!
//! The selected samples are split by the pivot on the classified channel.
//! For each side, the mean, minimum and maximum of every channel are scaled
//! against the global channel bounds, giving six series of seven values.

use ocean_common::channel::CHANNEL_COUNT;
use ocean_common::{Channel, ChannelStats, PointSample, RunningStats};
use renderer::Color;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Series color below the pivot (`#b5212f`).
pub const BELOW_COLOR: Color = Color::new(0xb5, 0x21, 0x2f);
/// Series color at or above the pivot (`#06618f`).
pub const ABOVE_COLOR: Color = Color::new(0x06, 0x61, 0x8f);

/// Aggregate drawn by a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    Min,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 3] = [Statistic::Mean, Statistic::Min, Statistic::Max];

    fn of(&self, stats: &RunningStats) -> f64 {
        match self {
            Statistic::Mean => stats.mean(),
            Statistic::Min => stats.min(),
            Statistic::Max => stats.max(),
        }
    }

    fn line_width(&self) -> f64 {
        match self {
            Statistic::Mean => 2.5,
            _ => 1.5,
        }
    }

    fn fill_alpha(&self) -> f64 {
        match self {
            Statistic::Min => 0.5,
            _ => 0.0,
        }
    }
}

/// Which side of the pivot a subset lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Value strictly below the pivot.
    Below,
    /// Value at or above the pivot.
    Above,
}

impl Side {
    fn color(&self) -> Color {
        match self {
            Side::Below => BELOW_COLOR,
            Side::Above => ABOVE_COLOR,
        }
    }
}

/// One polygon of the diagram: a normalized value per channel axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSeries {
    pub statistic: Statistic,
    pub side: Side,
    /// In [`Channel::ALL`] order. Undefined aggregates stay NaN.
    pub values: Vec<f64>,
    pub color: Color,
    pub line_width: f64,
    pub fill_alpha: f64,
}

/// Axes plus the six series, ordered mean, min, max with below before above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub channel: Channel,
    pub pivot: f64,
    pub axes: Vec<String>,
    pub series: Vec<DiagramSeries>,
}

/// Build the diagram for `samples` split at `pivot` on `channel`.
///
/// Samples whose `channel` reading is missing belong to neither side.
pub fn build_diagram<'a, I>(samples: I, stats: &ChannelStats, channel: Channel, pivot: f64) -> Diagram
where
    I: IntoIterator<Item = &'a PointSample>,
{
    let mut below = [RunningStats::new(); CHANNEL_COUNT];
    let mut above = [RunningStats::new(); CHANNEL_COUNT];

    for sample in samples {
        let v = sample.value(channel);
        let side = if v.is_nan() {
            continue;
        } else if v < pivot {
            &mut below
        } else {
            &mut above
        };
        for (acc, (_, value)) in side.iter_mut().zip(sample.values.iter()) {
            acc.push(value);
        }
    }

    debug!(
        channel = %channel,
        pivot = pivot,
        below = below[channel.index()].count(),
        above = above[channel.index()].count(),
        "Split selection at pivot"
    );

    let mut series = Vec::with_capacity(6);
    for statistic in Statistic::ALL {
        for (side, subset) in [(Side::Below, &below), (Side::Above, &above)] {
            let values = Channel::ALL
                .iter()
                .map(|c| stats.normalize(*c, statistic.of(&subset[c.index()])))
                .collect();
            series.push(DiagramSeries {
                statistic,
                side,
                values,
                color: side.color(),
                line_width: statistic.line_width(),
                fill_alpha: statistic.fill_alpha(),
            });
        }
    }

    Diagram {
        channel,
        pivot,
        axes: Channel::ALL.iter().map(|c| c.axis_label().to_string()).collect(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_common::{ChannelValues, TimeKey};

    fn sample(salinity: f64, sensor2: f64) -> PointSample {
        let mut values = ChannelValues::new([1.0; 7]);
        values[Channel::Salinity] = salinity;
        values[Channel::Sensor2] = sensor2;
        PointSample::new(54.0, 8.0, TimeKey::from_raw(201306010000).unwrap(), values)
    }

    fn global() -> ChannelStats {
        ChannelStats::from_samples(&[sample(0.0, 0.0), sample(40.0, 10.0)])
    }

    fn series(diagram: &Diagram, statistic: Statistic, side: Side) -> &DiagramSeries {
        diagram
            .series
            .iter()
            .find(|s| s.statistic == statistic && s.side == side)
            .unwrap()
    }

    #[test]
    fn test_six_series_in_order() {
        let selection = vec![sample(20.0, 2.0), sample(30.0, 8.0)];
        let diagram = build_diagram(&selection, &global(), Channel::Salinity, 25.0);

        let order: Vec<(Statistic, Side)> = diagram.series.iter().map(|s| (s.statistic, s.side)).collect();
        assert_eq!(
            order,
            vec![
                (Statistic::Mean, Side::Below),
                (Statistic::Mean, Side::Above),
                (Statistic::Min, Side::Below),
                (Statistic::Min, Side::Above),
                (Statistic::Max, Side::Below),
                (Statistic::Max, Side::Above),
            ]
        );
        assert_eq!(diagram.axes.len(), 7);
        assert!(diagram.series.iter().all(|s| s.values.len() == 7));
    }

    #[test]
    fn test_styling() {
        let diagram = build_diagram(&[sample(20.0, 2.0)], &global(), Channel::Salinity, 25.0);
        let widths: Vec<f64> = diagram.series.iter().map(|s| s.line_width).collect();
        let alphas: Vec<f64> = diagram.series.iter().map(|s| s.fill_alpha).collect();
        assert_eq!(widths, vec![2.5, 2.5, 1.5, 1.5, 1.5, 1.5]);
        assert_eq!(alphas, vec![0.0, 0.0, 0.5, 0.5, 0.0, 0.0]);
        assert_eq!(diagram.series[0].color.to_hex(), "#b5212f");
        assert_eq!(diagram.series[1].color, ABOVE_COLOR);
    }

    #[test]
    fn test_values_normalized_by_global_max() {
        let selection = vec![sample(20.0, 2.0), sample(30.0, 8.0), sample(35.0, 6.0)];
        let diagram = build_diagram(&selection, &global(), Channel::Salinity, 25.0);

        let max_above = series(&diagram, Statistic::Max, Side::Above);
        assert_eq!(max_above.values[Channel::Salinity.index()], 35.0 / 40.0);
        assert_eq!(max_above.values[Channel::Sensor2.index()], 8.0 / 10.0);

        let mean_below = series(&diagram, Statistic::Mean, Side::Below);
        assert_eq!(mean_below.values[Channel::Salinity.index()], 0.5);
    }

    #[test]
    fn test_pivot_value_counts_as_above() {
        let diagram = build_diagram(&[sample(25.0, 2.0)], &global(), Channel::Salinity, 25.0);
        assert!(series(&diagram, Statistic::Mean, Side::Below).values[0].is_nan());
        assert_eq!(series(&diagram, Statistic::Mean, Side::Above).values[0], 25.0 / 40.0);
    }

    #[test]
    fn test_missing_readings_are_skipped() {
        let mut partial = sample(30.0, f64::NAN);
        partial.values[Channel::Sensor3] = f64::NAN;
        let unclassified = sample(f64::NAN, 5.0);

        let diagram = build_diagram(&[partial, unclassified], &global(), Channel::Salinity, 25.0);
        let mean_above = series(&diagram, Statistic::Mean, Side::Above);
        assert_eq!(mean_above.values[0], 30.0 / 40.0);
        assert!(mean_above.values[Channel::Sensor2.index()].is_nan());
    }
}
