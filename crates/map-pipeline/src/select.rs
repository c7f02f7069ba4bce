//! Time window selection.

use ocean_common::{PointSample, PointSet, Provenance, TimeKey, TimeWindow};
use tracing::debug;

use crate::error::Result;

/// Samples of every partition whose key lies in `[start, end)`.
///
/// Partition membership and order are preserved. A window whose start is not
/// before its end selects nothing.
pub fn select(points: &PointSet, window: &TimeWindow) -> Result<PointSet> {
    let (start, end) = window.keys()?;

    let pick = |provenance: Provenance| in_range(points.partition(provenance), start, end);
    let selection = PointSet::new(
        pick(Provenance::Observation),
        pick(Provenance::Backward),
        pick(Provenance::Forward),
    );

    debug!(
        window = %window,
        observation = selection.observation.len(),
        backward = selection.backward.len(),
        forward = selection.forward.len(),
        "Selected samples"
    );

    Ok(selection)
}

fn in_range(samples: &[PointSample], start: TimeKey, end: TimeKey) -> Vec<PointSample> {
    samples
        .iter()
        .filter(|s| start <= s.time && s.time < end)
        .cloned()
        .collect()
}
