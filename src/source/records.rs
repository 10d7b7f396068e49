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

//! Typed metadata records handed from a metadata source to the engine.
//!
//! Every record here has already passed the ingestion boundary
//! ([`crate::source::ingest`]): counters are concrete numbers, content codes are
//! resolved and timestamps are UTC instants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Partition column name to partition value.
///
/// Keys are kept sorted so that two keys with the same columns and values
/// compare (and serialize) identically regardless of the order they were read in.
pub type PartitionKey = BTreeMap<String, serde_json::Value>;

/// Canonical label of a partition key, e.g. `{"day":"2024-05-01","region":"us"}`.
pub fn partition_label(key: &PartitionKey) -> String {
    serde_json::to_string(key).unwrap_or_default()
}

/// Content stored in a tracked file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContentType {
    /// Inserted rows
    #[serde(rename = "DATA_FILES")]
    Data,
    /// Rows logically removed (position or equality deletes)
    #[serde(rename = "DELETE_FILES")]
    Delete,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Data => "DATA_FILES",
            ContentType::Delete => "DELETE_FILES",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Kind of change a snapshot committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Append,
    Overwrite,
    Replace,
    Delete,
    Other,
}

impl Operation {
    /// Parse the `operation` property of a snapshot summary. Unknown names map to `Other`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "append" => Operation::Append,
            "overwrite" => Operation::Overwrite,
            "replace" => Operation::Replace,
            "delete" => Operation::Delete,
            _ => Operation::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Append => "append",
            Operation::Overwrite => "overwrite",
            Operation::Replace => "replace",
            Operation::Delete => "delete",
            Operation::Other => "other",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One physical file tracked by the current table state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub file_path: String,
    pub content_type: ContentType,
    pub size_bytes: u64,
    pub record_count: u64,
    pub partition_key: PartitionKey,
}

/// Per-snapshot change counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCounters {
    pub added_data_files: u64,
    pub deleted_data_files: u64,
    pub added_delete_files: u64,
    pub removed_delete_files: u64,
    pub added_records: u64,
    pub deleted_records: u64,
    pub changed_partition_count: u64,
}

/// Table totals recorded in a snapshot summary at commit time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeTotals {
    pub total_data_files: u64,
    pub total_delete_files: u64,
    pub total_files_size: u64,
}

/// One committed change to the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub snapshot_id: i64,
    pub parent_id: Option<i64>,
    pub operation: Operation,
    pub committed_at: DateTime<Utc>,
    pub manifest_list: Option<String>,
    pub counters: SnapshotCounters,
    pub totals: CumulativeTotals,
    /// Raw summary properties as written by the table format
    pub properties: HashMap<String, String>,
}

/// One current file reduced to what partition grouping needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionRow {
    pub partition_key: PartitionKey,
    pub content_type: ContentType,
    pub size_bytes: u64,
    pub record_count: u64,
}

impl From<&FileEntry> for PartitionRow {
    fn from(file: &FileEntry) -> Self {
        Self {
            partition_key: file.partition_key.clone(),
            content_type: file.content_type,
            size_bytes: file.size_bytes,
            record_count: file.record_count,
        }
    }
}

/// A file referenced by a manifest entry of some snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file_path: String,
}
