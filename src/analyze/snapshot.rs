// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use super::metrics::SnapshotMetrics;
use crate::source::records::SnapshotSummary;
use tracing::warn;

/// Change counters of the snapshot `snapshot_id`.
///
/// Returns the zero sentinel when there is no current snapshot, and also when
/// the id is not among `snapshots`; the latter indicates inconsistent metadata
/// and is logged rather than raised.
pub fn aggregate_snapshot_delta(
    snapshot_id: Option<i64>,
    snapshots: &[SnapshotSummary],
) -> SnapshotMetrics {
    let Some(id) = snapshot_id else {
        return SnapshotMetrics::zero();
    };

    match snapshots.iter().find(|s| s.snapshot_id == id) {
        Some(snapshot) => {
            SnapshotMetrics::from_counters(&snapshot.counters, snapshot.operation.as_str())
        }
        None => {
            warn!(
                "Current snapshot {} not found among {} snapshot summaries",
                id,
                snapshots.len()
            );
            SnapshotMetrics::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::records::{CumulativeTotals, Operation, SnapshotCounters};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn snapshot(id: i64, operation: Operation, counters: SnapshotCounters) -> SnapshotSummary {
        SnapshotSummary {
            snapshot_id: id,
            parent_id: None,
            operation,
            committed_at: Utc.timestamp_millis_opt(1_714_557_600_000).unwrap(),
            manifest_list: None,
            counters,
            totals: CumulativeTotals::default(),
            properties: HashMap::new(),
        }
    }

    #[test]
    fn test_no_current_snapshot_is_zero_sentinel() {
        let metrics = aggregate_snapshot_delta(None, &[]);

        assert!(metrics.is_zero());
        assert_eq!(metrics.operation, "");
    }

    #[test]
    fn test_unknown_snapshot_is_zero_sentinel() {
        let snapshots = vec![snapshot(1, Operation::Append, SnapshotCounters::default())];
        assert!(aggregate_snapshot_delta(Some(99), &snapshots).is_zero());
    }

    #[test]
    fn test_counters_copied_verbatim() {
        let counters = SnapshotCounters {
            added_data_files: 3,
            deleted_data_files: 1,
            added_delete_files: 2,
            removed_delete_files: 4,
            added_records: 300,
            deleted_records: 12,
            changed_partition_count: 5,
        };
        let snapshots = vec![
            snapshot(1, Operation::Append, SnapshotCounters::default()),
            snapshot(2, Operation::Overwrite, counters),
        ];
        let metrics = aggregate_snapshot_delta(Some(2), &snapshots);

        assert_eq!(metrics, SnapshotMetrics::from_counters(&counters, "overwrite"));
        assert_eq!(metrics.changed_partition_count, 5);
    }

    #[test]
    fn test_absent_counters_are_zero_not_sentinel() {
        let snapshots = vec![snapshot(7, Operation::Delete, SnapshotCounters::default())];
        let metrics = aggregate_snapshot_delta(Some(7), &snapshots);

        assert_eq!(metrics.operation, "delete");
        assert_eq!(metrics.added_data_files, 0);
        assert!(!metrics.is_zero());
    }
}
