use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::Fire;

/// Fires resolved jointly in one optimization pass. Holds indices into the
/// original batch, ordered by timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioGroup {
    fire_indices: Vec<usize>,
}

impl ScenarioGroup {
    pub fn fire_indices(&self) -> &[usize] {
        &self.fire_indices
    }

    pub fn len(&self) -> usize {
        self.fire_indices.len()
    }

    /// Always `false` for groups produced by [`group_by_time_proximity`].
    pub fn is_empty(&self) -> bool {
        self.fire_indices.is_empty()
    }

    /// Original batch index of the group's `local`-th fire.
    pub fn original_index(&self, local: usize) -> Option<usize> {
        self.fire_indices.get(local).copied()
    }
}

/// Chain-links fires into scenario groups: after a stable sort by timestamp,
/// a fire joins the current group when it follows the previous fire by at
/// most `window_minutes`. The window is measured between neighbours, so a
/// steady trickle of fires can produce a group longer than one window.
pub fn group_by_time_proximity(fires: &[Fire], window_minutes: f64) -> Result<Vec<ScenarioGroup>> {
    let mut timeline = fires
        .iter()
        .enumerate()
        .map(|(idx, fire)| fire.timestamp().map(|ts| (idx, ts)))
        .collect::<Result<Vec<_>>>()?;
    timeline.sort_by_key(|(_, ts)| *ts);

    let mut groups: Vec<ScenarioGroup> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut prev_ts: Option<NaiveDateTime> = None;

    for (idx, ts) in timeline {
        if let Some(prev) = prev_ts {
            let gap_minutes = (ts - prev).num_seconds() as f64 / 60.0;
            if gap_minutes > window_minutes {
                groups.push(ScenarioGroup { fire_indices: std::mem::take(&mut current) });
            }
        }
        current.push(idx);
        prev_ts = Some(ts);
    }
    if !current.is_empty() {
        groups.push(ScenarioGroup { fire_indices: current });
    }

    debug!(fires = fires.len(), groups = groups.len(), window_minutes, "grouped fires into scenarios");
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::models::Location;
    use proptest::prelude::*;

    fn fire_at(id: usize, time: &str) -> Fire {
        Fire {
            id: format!("F{id}"),
            location: Location::new(37.0, 127.0),
            date: "2024-04-05".into(),
            time: time.into(),
            intensity: 1,
        }
    }

    fn indices(groups: &[ScenarioGroup]) -> Vec<Vec<usize>> {
        groups.iter().map(|g| g.fire_indices().to_vec()).collect()
    }

    #[test]
    fn five_minutes_apart_share_a_group() {
        let fires = vec![fire_at(0, "10:00"), fire_at(1, "10:05")];
        assert_eq!(indices(&group_by_time_proximity(&fires, 10.0).unwrap()), vec![vec![0, 1]]);
    }

    #[test]
    fn thirty_minutes_apart_split() {
        let fires = vec![fire_at(0, "10:00"), fire_at(1, "10:30")];
        assert_eq!(indices(&group_by_time_proximity(&fires, 10.0).unwrap()), vec![vec![0], vec![1]]);
    }

    #[test]
    fn gap_equal_to_window_is_inclusive() {
        let fires = vec![fire_at(0, "10:00"), fire_at(1, "10:10")];
        assert_eq!(group_by_time_proximity(&fires, 10.0).unwrap().len(), 1);
    }

    #[test]
    fn gaps_are_measured_to_the_second() {
        let fires = vec![fire_at(0, "10:00:00"), fire_at(1, "10:10:30"), fire_at(2, "10:20:30")];
        assert_eq!(indices(&group_by_time_proximity(&fires, 10.0).unwrap()), vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn trickle_chains_past_one_window() {
        let fires = vec![
            fire_at(0, "10:00"),
            fire_at(1, "10:08"),
            fire_at(2, "10:16"),
            fire_at(3, "10:24"),
        ];
        assert_eq!(indices(&group_by_time_proximity(&fires, 10.0).unwrap()), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn keeps_original_indices_in_time_order() {
        let fires = vec![
            fire_at(0, "12:00"),
            fire_at(1, "10:00"),
            fire_at(2, "12:03"),
            fire_at(3, "10:04"),
        ];
        assert_eq!(
            indices(&group_by_time_proximity(&fires, 5.0).unwrap()),
            vec![vec![1, 3], vec![0, 2]]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let fires = vec![fire_at(0, "10:00"), fire_at(1, "09:00"), fire_at(2, "10:00")];
        assert_eq!(indices(&group_by_time_proximity(&fires, 0.0).unwrap()), vec![vec![1], vec![0, 2]]);
    }

    #[test]
    fn empty_batch_has_no_groups() {
        assert!(group_by_time_proximity(&[], 10.0).unwrap().is_empty());
    }

    #[test]
    fn bad_timestamp_fails_the_batch() {
        let fires = vec![fire_at(0, "10:00"), fire_at(1, "late")];
        let err = group_by_time_proximity(&fires, 10.0).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidTimestamp { ref fire, .. } if fire == "F1"));
    }

    proptest! {
        #[test]
        fn groups_partition_and_respect_window(
            minutes in proptest::collection::vec(0u32..600, 1..40),
            window in 0u32..60,
        ) {
            let fires: Vec<Fire> = minutes
                .iter()
                .enumerate()
                .map(|(i, m)| fire_at(i, &format!("{:02}:{:02}", m / 60, m % 60)))
                .collect();
            let groups = group_by_time_proximity(&fires, window as f64).unwrap();

            let mut seen: Vec<usize> = groups.iter().flat_map(|g| g.fire_indices().to_vec()).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..fires.len()).collect::<Vec<_>>());

            for group in &groups {
                prop_assert!(!group.is_empty());
                for pair in group.fire_indices().windows(2) {
                    let (a, b) = (minutes[pair[0]], minutes[pair[1]]);
                    prop_assert!(a <= b);
                    prop_assert!(b - a <= window);
                }
            }
            for pair in groups.windows(2) {
                let last = minutes[*pair[0].fire_indices().last().unwrap()];
                let first = minutes[pair[1].fire_indices()[0]];
                prop_assert!(first - last > window);
            }
        }
    }
}
