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

use super::metrics::{format_timestamp, ExpirationCandidate};
use crate::source::records::SnapshotSummary;
use chrono::{DateTime, Duration, Utc};

/// Snapshots committed strictly before `now - threshold`, in input order.
///
/// `now` is supplied by the caller so the evaluation is reproducible.
/// Nothing is expired; the result only lists candidates. A threshold reaching
/// past the earliest representable instant keeps every snapshot.
pub fn find_expirable_snapshots(
    snapshots: &[SnapshotSummary],
    threshold: Duration,
    now: DateTime<Utc>,
) -> Vec<ExpirationCandidate> {
    let Some(cutoff) = now.checked_sub_signed(threshold) else {
        return Vec::new();
    };
    snapshots
        .iter()
        .filter(|s| s.committed_at < cutoff)
        .map(|s| ExpirationCandidate {
            snapshot_id: s.snapshot_id,
            timestamp_ms: s.committed_at.timestamp_millis(),
            timestamp: format_timestamp(&s.committed_at),
            manifest_list: s.manifest_list.clone(),
            summary: s
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::constants::DEFAULT_RETENTION_DAYS;
    use crate::source::records::{CumulativeTotals, Operation, SnapshotCounters};
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn snapshot(id: i64, committed_at: DateTime<Utc>) -> SnapshotSummary {
        let mut properties = HashMap::new();
        properties.insert("operation".to_string(), "append".to_string());
        SnapshotSummary {
            snapshot_id: id,
            parent_id: None,
            operation: Operation::Append,
            committed_at,
            manifest_list: Some(format!("s3://b/t/metadata/snap-{}.avro", id)),
            counters: SnapshotCounters::default(),
            totals: CumulativeTotals::default(),
            properties,
        }
    }

    #[test]
    fn test_only_snapshots_past_retention() {
        let snapshots = vec![
            snapshot(1, now() - Duration::days(40)),
            snapshot(2, now() - Duration::days(10)),
        ];
        let expirable =
            find_expirable_snapshots(&snapshots, Duration::days(DEFAULT_RETENTION_DAYS), now());

        assert_eq!(expirable.len(), 1);
        let candidate = &expirable[0];
        assert_eq!(candidate.snapshot_id, 1);
        assert_eq!(
            candidate.timestamp_ms,
            (now() - Duration::days(40)).timestamp_millis()
        );
        assert_eq!(candidate.timestamp, "2024-05-21T12:00:00.000Z");
        assert_eq!(
            candidate.manifest_list.as_deref(),
            Some("s3://b/t/metadata/snap-1.avro")
        );
        assert_eq!(
            candidate.summary.get("operation").map(String::as_str),
            Some("append")
        );
    }

    #[test]
    fn test_cutoff_is_exclusive() {
        let threshold = Duration::days(30);
        let snapshots = vec![snapshot(1, now() - threshold)];
        assert!(find_expirable_snapshots(&snapshots, threshold, now()).is_empty());
    }

    #[test]
    fn test_keeps_input_order() {
        let snapshots = vec![
            snapshot(3, now() - Duration::days(35)),
            snapshot(1, now() - Duration::days(90)),
            snapshot(2, now() - Duration::days(60)),
        ];
        let ids: Vec<i64> = find_expirable_snapshots(&snapshots, Duration::days(30), now())
            .iter()
            .map(|c| c.snapshot_id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_unbounded_retention_keeps_everything() {
        let snapshots = vec![snapshot(1, now() - Duration::days(4000))];

        assert!(
            find_expirable_snapshots(&snapshots, Duration::days(100_000_000), now()).is_empty()
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(find_expirable_snapshots(&[], Duration::days(30), now()).is_empty());
    }
}
