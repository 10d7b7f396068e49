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

//! Output types produced by the aggregators and the analyzer.
//!
//! Every type here is a plain value: serializable, cloneable and never updated
//! after it has been computed.

use super::constants::{BYTES_PER_GB, BYTES_PER_MB};
use crate::source::records::{partition_label, ContentType, CumulativeTotals, PartitionKey, SnapshotCounters};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Partitions listed in the text report before the rest are summarized.
const REPORT_PARTITION_ROWS: usize = 20;

/// Render a commit instant as ISO-8601 UTC with millisecond precision,
/// e.g. `2024-05-01T10:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_size(bytes: u64) -> String {
    let size_gb = bytes as f64 / BYTES_PER_GB;
    if size_gb >= 1.0 {
        format!("{:.2} GB", size_gb)
    } else {
        format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
    }
}

/// Totals over the files live in the current snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveTableMetrics {
    pub total_data_files: u64,
    pub total_delete_files: u64,
    pub total_files_size: u64,
    pub data_file_size: u64,
    pub delete_file_size: u64,
    /// Data records minus delete records. Negative when delete files carry
    /// more rows than the data files they apply to.
    pub record_count: i64,
}

/// Change counters of a single snapshot.
///
/// The default value is the zero sentinel: every counter 0 and an empty
/// operation, returned when there is no snapshot to describe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetrics {
    pub added_data_files: u64,
    pub deleted_data_files: u64,
    pub added_delete_files: u64,
    pub removed_delete_files: u64,
    pub added_records: u64,
    pub deleted_records: u64,
    pub changed_partition_count: u64,
    pub operation: String,
}

impl SnapshotMetrics {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn from_counters(counters: &SnapshotCounters, operation: impl Into<String>) -> Self {
        Self {
            added_data_files: counters.added_data_files,
            deleted_data_files: counters.deleted_data_files,
            added_delete_files: counters.added_delete_files,
            removed_delete_files: counters.removed_delete_files,
            added_records: counters.added_records,
            deleted_records: counters.deleted_records,
            changed_partition_count: counters.changed_partition_count,
            operation: operation.into(),
        }
    }
}

/// Rollup of the current files sharing one partition key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionMetrics {
    pub partition_key: PartitionKey,
    pub data_file_count: u64,
    pub delete_file_count: u64,
    pub total_data_file_size: u64,
    /// Records in the partition's data files
    pub record_count: u64,
    pub avg_file_size_per_partition: f64,
}

impl PartitionMetrics {
    pub fn label(&self) -> String {
        partition_label(&self.partition_key)
    }
}

/// Distribution statistics for one content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeMetrics {
    pub file_type: ContentType,
    pub file_count: u64,
    pub avg_record_count: u64,
    pub max_record_count: u64,
    pub min_record_count: u64,
    pub avg_file_size: u64,
    pub max_file_size: u64,
    pub min_file_size: u64,
}

/// One entry of the snapshot history window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSnapshotRecord {
    pub snapshot_id: i64,
    pub timestamp: String,
    pub parent_id: Option<i64>,
    pub operation: String,
    pub counters: SnapshotCounters,
    /// Table totals as recorded at commit time, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<CumulativeTotals>,
}

/// A snapshot old enough to be expired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationCandidate {
    pub snapshot_id: i64,
    pub timestamp_ms: i64,
    pub timestamp: String,
    pub manifest_list: Option<String>,
    pub summary: BTreeMap<String, String>,
}

/// Everything the analyzer derives for one table in a single pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetrics {
    pub table_name: String,
    pub live_table_metrics: LiveTableMetrics,
    pub snapshot_metrics: SnapshotMetrics,
    pub partition_metrics: Vec<PartitionMetrics>,
    pub file_metrics: Vec<FileTypeMetrics>,
    pub historical_snapshots: Vec<HistoricalSnapshotRecord>,
}

impl TableMetrics {
    pub fn to_json(&self) -> Result<String, JsonError> {
        serde_json::to_string_pretty(self)
    }
}

/// Consolidated health view of one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHealthMetrics {
    pub total_size_bytes: u64,
    pub total_files: u64,
    pub total_partitions: u64,
    pub average_partition_size_bytes: f64,
    /// Partition label to number of current files
    pub files_per_partition: BTreeMap<String, u64>,
    /// Partition label to bytes in current files
    pub partition_sizes_bytes: BTreeMap<String, u64>,
    pub orphan_files: Vec<String>,
    pub partition_skewness: f64,
    pub snapshots_to_expire: Vec<ExpirationCandidate>,
}

impl TableHealthMetrics {
    pub fn to_json(&self) -> Result<String, JsonError> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for TableMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "\n{}", "━".repeat(80))?;
        writeln!(f, " {:<60}", "Table Metrics Report")?;
        writeln!(f, "{}", "━".repeat(80))?;
        writeln!(f, " {}", self.table_name)?;
        writeln!(f, "{}", "━".repeat(80))?;

        // Live state and latest snapshot (side by side)
        let live = &self.live_table_metrics;
        let snap = &self.snapshot_metrics;
        writeln!(f)?;
        writeln!(f, " {:<41} {}", "Live State", "Latest Snapshot")?;
        writeln!(f, "{}", "━".repeat(80))?;
        let operation = if snap.operation.is_empty() {
            "-"
        } else {
            snap.operation.as_str()
        };
        let rows: [(&str, String, &str, String); 6] = [
            (
                "Data Files",
                live.total_data_files.to_string(),
                "Operation",
                operation.to_string(),
            ),
            (
                "Delete Files",
                live.total_delete_files.to_string(),
                "Added Data Files",
                snap.added_data_files.to_string(),
            ),
            (
                "Total Size",
                format_size(live.total_files_size),
                "Deleted Data Files",
                snap.deleted_data_files.to_string(),
            ),
            (
                "Data Size",
                format_size(live.data_file_size),
                "Added Delete Files",
                snap.added_delete_files.to_string(),
            ),
            (
                "Delete Size",
                format_size(live.delete_file_size),
                "Added Records",
                snap.added_records.to_string(),
            ),
            (
                "Records",
                live.record_count.to_string(),
                "Changed Partitions",
                snap.changed_partition_count.to_string(),
            ),
        ];
        for (left, left_value, right, right_value) in rows.iter() {
            writeln!(
                f,
                " {:<19} {:>12}          {:<19} {:>12}",
                left, left_value, right, right_value
            )?;
        }

        // File types
        writeln!(f)?;
        writeln!(f, " {}", "File Types")?;
        writeln!(f, "{}", "━".repeat(80))?;
        if self.file_metrics.is_empty() {
            writeln!(f, " No files in the current snapshot")?;
        } else {
            writeln!(
                f,
                " {:<14} {:>8} {:>12} {:>12} {:>12} {:>12}",
                "Type", "Files", "Avg Size", "Min Size", "Max Size", "Avg Records"
            )?;
            for m in &self.file_metrics {
                writeln!(
                    f,
                    " {:<14} {:>8} {:>12} {:>12} {:>12} {:>12}",
                    m.file_type.as_str(),
                    m.file_count,
                    format_size(m.avg_file_size),
                    format_size(m.min_file_size),
                    format_size(m.max_file_size),
                    m.avg_record_count
                )?;
            }
        }

        // Partitions
        writeln!(f)?;
        writeln!(f, " Partitions ({})", self.partition_metrics.len())?;
        writeln!(f, "{}", "━".repeat(80))?;
        for p in self.partition_metrics.iter().take(REPORT_PARTITION_ROWS) {
            writeln!(
                f,
                " {:<40} {:>6} data {:>4} del {:>12}",
                p.label(),
                p.data_file_count,
                p.delete_file_count,
                format_size(p.total_data_file_size)
            )?;
        }
        if self.partition_metrics.len() > REPORT_PARTITION_ROWS {
            writeln!(
                f,
                " ... and {} more",
                self.partition_metrics.len() - REPORT_PARTITION_ROWS
            )?;
        }

        // History
        writeln!(f)?;
        writeln!(f, " Snapshot History ({})", self.historical_snapshots.len())?;
        writeln!(f, "{}", "━".repeat(80))?;
        for h in &self.historical_snapshots {
            writeln!(
                f,
                " {:<20} {:<25} {:<10} +{} files, -{} files",
                h.snapshot_id,
                h.timestamp,
                h.operation,
                h.counters.added_data_files,
                h.counters.deleted_data_files
            )?;
        }
        writeln!(f, "{}", "━".repeat(80))?;
        Ok(())
    }
}

impl Display for TableHealthMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "\n{}", "━".repeat(80))?;
        writeln!(
            f,
            " {:<60} Skew: {:>6.3} ",
            "Table Health", self.partition_skewness
        )?;
        writeln!(f, "{}", "━".repeat(80))?;
        writeln!(f, " {:<30} {:>12}", "Total Files", self.total_files)?;
        writeln!(
            f,
            " {:<30} {:>12}",
            "Total Size",
            format_size(self.total_size_bytes)
        )?;
        writeln!(f, " {:<30} {:>12}", "Partitions", self.total_partitions)?;
        writeln!(
            f,
            " {:<30} {:>12}",
            "Avg Partition Size",
            format_size(self.average_partition_size_bytes as u64)
        )?;
        writeln!(f, " {:<30} {:>12}", "Orphan Files", self.orphan_files.len())?;
        writeln!(
            f,
            " {:<30} {:>12}",
            "Snapshots To Expire",
            self.snapshots_to_expire.len()
        )?;

        if !self.orphan_files.is_empty() {
            writeln!(f)?;
            writeln!(f, " {}", "Orphan Files")?;
            writeln!(f, "{}", "━".repeat(80))?;
            for path in &self.orphan_files {
                writeln!(f, " {}", path)?;
            }
        }

        if !self.snapshots_to_expire.is_empty() {
            writeln!(f)?;
            writeln!(f, " {}", "Snapshots To Expire")?;
            writeln!(f, "{}", "━".repeat(80))?;
            for s in &self.snapshots_to_expire {
                writeln!(f, " {:<20} {}", s.snapshot_id, s.timestamp)?;
            }
        }
        writeln!(f, "{}", "━".repeat(80))?;
        Ok(())
    }
}
