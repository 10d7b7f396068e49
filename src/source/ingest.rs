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

//! Ingestion boundary between raw metadata documents and typed records.
//!
//! Snapshot summaries written by table formats are loose string maps: older
//! writers omit counters, some write numbers instead of strings, and partial
//! commits leave fields empty. All of that is resolved here, once. A missing or
//! unparsable counter becomes `0`; nothing downstream checks for absence again.
//!
//! Structural damage is different: a snapshot without a commit timestamp or a
//! file with an unknown content code cannot be coalesced and is reported as
//! [`SourceError::Malformed`].

use super::error::{SourceError, SourceResult};
use super::memory::TableState;
use super::records::{
    ContentType, CumulativeTotals, FileEntry, ManifestEntry, Operation, PartitionKey,
    SnapshotCounters, SnapshotSummary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Summary keys holding per-snapshot change counters
pub const ADDED_DATA_FILES: &str = "added-data-files";
pub const DELETED_DATA_FILES: &str = "deleted-data-files";
pub const ADDED_DELETE_FILES: &str = "added-delete-files";
pub const REMOVED_DELETE_FILES: &str = "removed-delete-files";
pub const ADDED_RECORDS: &str = "added-records";
pub const DELETED_RECORDS: &str = "deleted-records";
pub const CHANGED_PARTITION_COUNT: &str = "changed-partition-count";

/// Summary keys holding table totals at commit time
pub const TOTAL_DATA_FILES: &str = "total-data-files";
pub const TOTAL_DELETE_FILES: &str = "total-delete-files";
pub const TOTAL_FILES_SIZE: &str = "total-files-size";

/// Summary key holding the snapshot operation
pub const OPERATION: &str = "operation";

/// JSON metadata document describing one table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableDocument {
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub current_snapshot_id: Option<i64>,
    #[serde(default)]
    pub snapshots: Vec<RawSnapshot>,
    #[serde(default)]
    pub files: Vec<RawFile>,
    #[serde(default)]
    pub manifests: Vec<RawManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawSnapshot {
    pub snapshot_id: i64,
    #[serde(default)]
    pub parent_snapshot_id: Option<i64>,
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
    #[serde(default)]
    pub manifest_list: Option<String>,
    #[serde(default)]
    pub summary: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawFile {
    pub file_path: String,
    /// 0 = data, 1 = position deletes, 2 = equality deletes. Absent in v1 tables.
    #[serde(default)]
    pub content: Option<i64>,
    #[serde(default)]
    pub file_size_in_bytes: Option<Value>,
    #[serde(default)]
    pub record_count: Option<Value>,
    #[serde(default)]
    pub partition: PartitionKey,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawManifest {
    #[serde(default)]
    pub manifest_path: Option<String>,
    #[serde(default)]
    pub added_snapshot_id: Option<i64>,
    #[serde(default)]
    pub entries: Vec<RawManifestEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawManifestEntry {
    pub file_path: String,
}

/// Coalesce an optional raw numeric value to a `u64`, defaulting to 0.
///
/// Accepts JSON numbers and numeric strings. Negative, fractional or
/// non-numeric values are treated as absent.
pub fn coalesce_u64(value: Option<&Value>, field: &str) -> u64 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| {
            debug!("Coalescing non-integral {}={} to 0", field, n);
            0
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or_else(|_| {
            debug!("Coalescing unparsable {}={:?} to 0", field, s);
            0
        }),
        Some(other) => {
            debug!("Coalescing unexpected {}={} to 0", field, other);
            0
        }
    }
}

/// Read one counter out of a raw snapshot summary, defaulting to 0.
pub fn summary_counter(summary: &Map<String, Value>, key: &str) -> u64 {
    coalesce_u64(summary.get(key), key)
}

pub fn counters_from_summary(summary: &Map<String, Value>) -> SnapshotCounters {
    SnapshotCounters {
        added_data_files: summary_counter(summary, ADDED_DATA_FILES),
        deleted_data_files: summary_counter(summary, DELETED_DATA_FILES),
        added_delete_files: summary_counter(summary, ADDED_DELETE_FILES),
        removed_delete_files: summary_counter(summary, REMOVED_DELETE_FILES),
        added_records: summary_counter(summary, ADDED_RECORDS),
        deleted_records: summary_counter(summary, DELETED_RECORDS),
        changed_partition_count: summary_counter(summary, CHANGED_PARTITION_COUNT),
    }
}

pub fn totals_from_summary(summary: &Map<String, Value>) -> CumulativeTotals {
    CumulativeTotals {
        total_data_files: summary_counter(summary, TOTAL_DATA_FILES),
        total_delete_files: summary_counter(summary, TOTAL_DELETE_FILES),
        total_files_size: summary_counter(summary, TOTAL_FILES_SIZE),
    }
}

/// Resolve a raw content code.
pub fn content_type_from_code(code: Option<i64>, file_path: &str) -> SourceResult<ContentType> {
    match code {
        None | Some(0) => Ok(ContentType::Data),
        Some(1) | Some(2) => Ok(ContentType::Delete),
        Some(other) => Err(SourceError::Malformed(format!(
            "file {} has unknown content code {}",
            file_path, other
        ))),
    }
}

pub fn ingest_file(raw: &RawFile) -> SourceResult<FileEntry> {
    Ok(FileEntry {
        file_path: raw.file_path.clone(),
        content_type: content_type_from_code(raw.content, &raw.file_path)?,
        size_bytes: coalesce_u64(raw.file_size_in_bytes.as_ref(), "file-size-in-bytes"),
        record_count: coalesce_u64(raw.record_count.as_ref(), "record-count"),
        partition_key: raw.partition.clone(),
    })
}

pub fn ingest_snapshot(raw: &RawSnapshot) -> SourceResult<SnapshotSummary> {
    let timestamp_ms = raw.timestamp_ms.ok_or_else(|| {
        SourceError::Malformed(format!(
            "snapshot {} has no commit timestamp",
            raw.snapshot_id
        ))
    })?;
    let committed_at: DateTime<Utc> =
        DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
            SourceError::Malformed(format!(
                "snapshot {} has out-of-range timestamp {}",
                raw.snapshot_id, timestamp_ms
            ))
        })?;

    let operation = raw
        .summary
        .get(OPERATION)
        .and_then(|v| v.as_str())
        .map(Operation::parse)
        .unwrap_or(Operation::Other);

    let properties: HashMap<String, String> = raw
        .summary
        .iter()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect();

    Ok(SnapshotSummary {
        snapshot_id: raw.snapshot_id,
        parent_id: raw.parent_snapshot_id,
        operation,
        committed_at,
        manifest_list: raw.manifest_list.clone(),
        counters: counters_from_summary(&raw.summary),
        totals: totals_from_summary(&raw.summary),
        properties,
    })
}

/// Convert a whole metadata document into a materialized table state.
///
/// `fallback_name` is used when the document carries no table name. A
/// negative current snapshot id is the table format's "no snapshot" marker.
pub fn ingest_document(doc: &TableDocument, fallback_name: &str) -> SourceResult<TableState> {
    let files = doc
        .files
        .iter()
        .map(ingest_file)
        .collect::<SourceResult<Vec<_>>>()?;
    let snapshots = doc
        .snapshots
        .iter()
        .map(ingest_snapshot)
        .collect::<SourceResult<Vec<_>>>()?;
    let manifest_entries = doc
        .manifests
        .iter()
        .flat_map(|m| m.entries.iter())
        .map(|e| ManifestEntry {
            file_path: e.file_path.clone(),
        })
        .collect();

    Ok(TableState {
        table_name: doc
            .table_name
            .clone()
            .unwrap_or_else(|| fallback_name.to_string()),
        current_snapshot_id: doc.current_snapshot_id.filter(|id| *id >= 0),
        files,
        snapshots,
        manifest_entries,
    })
}
