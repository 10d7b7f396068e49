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

use super::metrics::{format_timestamp, HistoricalSnapshotRecord};
use crate::source::records::SnapshotSummary;
use std::cmp::Reverse;

/// Build the newest-first window of at most `limit` snapshots.
///
/// Snapshots are ordered by commit time descending, ties broken by snapshot id
/// descending. Cumulative totals are taken from each summary as recorded and
/// only included when `include_totals` is set.
pub fn build_historical_series(
    snapshots: &[SnapshotSummary],
    limit: usize,
    include_totals: bool,
) -> Vec<HistoricalSnapshotRecord> {
    let mut ordered: Vec<&SnapshotSummary> = snapshots.iter().collect();
    ordered.sort_by_key(|s| Reverse((s.committed_at, s.snapshot_id)));

    ordered
        .into_iter()
        .take(limit)
        .map(|s| HistoricalSnapshotRecord {
            snapshot_id: s.snapshot_id,
            timestamp: format_timestamp(&s.committed_at),
            parent_id: s.parent_id,
            operation: s.operation.as_str().to_string(),
            counters: s.counters,
            totals: include_totals.then_some(s.totals),
        })
        .collect()
}
