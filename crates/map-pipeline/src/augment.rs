//! Label join between observations and derived samples.
//!
//! Backward and forward extrapolations arrive with a position, a time and the
//! label of the observation they were derived from, but no channel values.
//! The join copies the observation's seven values onto each derived row.

use std::collections::HashMap;

use ocean_common::{ChannelValues, PointSample, PointSet, Provenance};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

/// Fill the channel values of every derived row from its observation.
///
/// All or nothing: the first row whose label is absent or unknown fails the
/// whole partition. Observations without a label are not indexed; when two
/// observations share a label the first one wins.
pub fn join_labels(
    observations: &[PointSample],
    derived: &[PointSample],
    provenance: Provenance,
) -> Result<Vec<PointSample>> {
    let index = label_index(observations);
    join_with_index(&index, derived, provenance)
}

/// Augment both derived partitions in place.
///
/// A partition that fails the join is left as it was and the failure is
/// logged; the other partition is still augmented. Returns the number of
/// partitions augmented.
pub fn augment_derived(points: &mut PointSet) -> usize {
    let index = label_index(&points.observation);
    let mut augmented = 0;

    for provenance in [Provenance::Backward, Provenance::Forward] {
        match join_with_index(&index, points.partition(provenance), provenance) {
            Ok(rows) => {
                debug!(provenance = %provenance, rows = rows.len(), "Joined derived samples");
                *points.partition_mut(provenance) = rows;
                augmented += 1;
            }
            Err(e) => {
                warn!(provenance = %provenance, error = %e, "Derived samples left unaugmented");
            }
        }
    }

    augmented
}

fn label_index(observations: &[PointSample]) -> HashMap<u64, ChannelValues> {
    let mut index = HashMap::with_capacity(observations.len());
    for sample in observations {
        if let Some(label) = sample.label {
            index.entry(label).or_insert(sample.values);
        }
    }
    index
}

fn join_with_index(
    index: &HashMap<u64, ChannelValues>,
    derived: &[PointSample],
    provenance: Provenance,
) -> Result<Vec<PointSample>> {
    derived
        .iter()
        .enumerate()
        .map(|(row, sample)| {
            let label = sample
                .label
                .ok_or(PipelineError::UnlabeledRow { provenance, row })?;
            let values = index
                .get(&label)
                .ok_or(PipelineError::MissingJoinKey { provenance, label })?;
            Ok(PointSample {
                values: *values,
                ..sample.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocean_common::{Channel, TimeKey};

    fn key() -> TimeKey {
        TimeKey::from_raw(201306010000).unwrap()
    }

    fn observation(label: u64, salinity: f64) -> PointSample {
        let mut values = ChannelValues::missing();
        values[Channel::Salinity] = salinity;
        PointSample::new(54.0, 8.0, key(), values).with_label(label)
    }

    fn derived(label: u64) -> PointSample {
        PointSample::new(54.5, 8.5, key(), ChannelValues::missing()).with_label(label)
    }

    #[test]
    fn test_join_copies_values() {
        let obs = vec![observation(1, 30.0), observation(2, 31.0)];
        let rows = join_labels(&obs, &[derived(2), derived(1)], Provenance::Forward).unwrap();
        assert_eq!(rows[0].value(Channel::Salinity), 31.0);
        assert_eq!(rows[1].value(Channel::Salinity), 30.0);
        // position and time stay those of the derived row
        assert_eq!(rows[0].latitude, 54.5);
    }

    #[test]
    fn test_missing_label_fails_whole_partition() {
        let obs = vec![observation(1, 30.0)];
        let err = join_labels(&obs, &[derived(1), derived(9)], Provenance::Backward).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingJoinKey {
                provenance: Provenance::Backward,
                label: 9
            }
        ));
    }

    #[test]
    fn test_unlabeled_row_fails() {
        let obs = vec![observation(1, 30.0)];
        let unlabeled = PointSample::new(54.5, 8.5, key(), ChannelValues::missing());
        let err = join_labels(&obs, &[derived(1), unlabeled], Provenance::Forward).unwrap_err();
        assert!(matches!(err, PipelineError::UnlabeledRow { row: 1, .. }));
    }

    #[test]
    fn test_first_duplicate_label_wins() {
        let obs = vec![observation(1, 30.0), observation(1, 99.0)];
        let rows = join_labels(&obs, &[derived(1)], Provenance::Forward).unwrap();
        assert_eq!(rows[0].value(Channel::Salinity), 30.0);
    }

    #[test]
    fn test_augment_keeps_failed_partition() {
        let mut set = PointSet::new(
            vec![observation(1, 30.0)],
            vec![derived(1)],
            vec![derived(1), derived(7)],
        );
        assert_eq!(augment_derived(&mut set), 1);
        assert_eq!(set.backward[0].value(Channel::Salinity), 30.0);
        assert!(set.forward[0].values.is_missing());
        assert!(set.forward[1].values.is_missing());
    }
}
