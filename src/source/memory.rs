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

use super::error::SourceResult;
use super::records::{FileEntry, ManifestEntry, PartitionRow, SnapshotSummary};
use super::MetadataSource;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fully materialized metadata of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub table_name: String,
    pub current_snapshot_id: Option<i64>,
    pub files: Vec<FileEntry>,
    pub snapshots: Vec<SnapshotSummary>,
    pub manifest_entries: Vec<ManifestEntry>,
}

impl TableState {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn with_current_snapshot(mut self, snapshot_id: Option<i64>) -> Self {
        self.current_snapshot_id = snapshot_id;
        self
    }

    pub fn with_files(mut self, files: Vec<FileEntry>) -> Self {
        self.files = files;
        self
    }

    pub fn with_snapshots(mut self, snapshots: Vec<SnapshotSummary>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn with_manifest_entries(mut self, entries: Vec<ManifestEntry>) -> Self {
        self.manifest_entries = entries;
        self
    }

    /// One partition row per current file.
    pub fn partition_rows(&self) -> Vec<PartitionRow> {
        self.files.iter().map(PartitionRow::from).collect()
    }

    /// Paths a scan of the current snapshot plans: the current files.
    pub fn reachable_paths(&self) -> HashSet<String> {
        self.files.iter().map(|f| f.file_path.clone()).collect()
    }
}

/// Metadata source over a table state already held in memory.
///
/// This is the variant a catalog integration produces after loading a table:
/// the records are read once and every call hands out a copy.
pub struct InMemorySource {
    state: TableState,
}

impl InMemorySource {
    pub fn new(state: TableState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }
}

#[async_trait]
impl MetadataSource for InMemorySource {
    fn table_name(&self) -> &str {
        &self.state.table_name
    }

    async fn current_snapshot_id(&self) -> SourceResult<Option<i64>> {
        Ok(self.state.current_snapshot_id)
    }

    async fn list_current_files(&self) -> SourceResult<Vec<FileEntry>> {
        Ok(self.state.files.clone())
    }

    async fn list_snapshots(&self) -> SourceResult<Vec<SnapshotSummary>> {
        Ok(self.state.snapshots.clone())
    }

    async fn list_current_partitions(&self) -> SourceResult<Vec<PartitionRow>> {
        Ok(self.state.partition_rows())
    }

    async fn plan_all_reachable_file_paths(&self) -> SourceResult<HashSet<String>> {
        Ok(self.state.reachable_paths())
    }

    async fn walk_all_manifest_entries(&self) -> SourceResult<Vec<ManifestEntry>> {
        Ok(self.state.manifest_entries.clone())
    }

    async fn load_state(&self) -> SourceResult<TableState> {
        Ok(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::records::{ContentType, PartitionKey};
    use serde_json::json;

    fn file(path: &str, content_type: ContentType, size: u64) -> FileEntry {
        let mut partition_key = PartitionKey::new();
        partition_key.insert("region".to_string(), json!("eu"));
        FileEntry {
            file_path: path.to_string(),
            content_type,
            size_bytes: size,
            record_count: 1,
            partition_key,
        }
    }

    #[tokio::test]
    async fn test_in_memory_source_streams() {
        let state = TableState::new("db.events")
            .with_current_snapshot(Some(3))
            .with_files(vec![
                file("a.parquet", ContentType::Data, 10),
                file("a-deletes.parquet", ContentType::Delete, 2),
            ])
            .with_manifest_entries(vec![ManifestEntry {
                file_path: "a.parquet".to_string(),
            }]);
        let source = InMemorySource::new(state);

        assert_eq!(source.table_name(), "db.events");
        assert_eq!(source.current_snapshot_id().await.unwrap(), Some(3));
        assert_eq!(source.list_current_files().await.unwrap().len(), 2);
        assert!(source.list_snapshots().await.unwrap().is_empty());

        let rows = source.list_current_partitions().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].content_type, ContentType::Delete);

        let reachable = source.plan_all_reachable_file_paths().await.unwrap();
        assert!(reachable.contains("a.parquet"));
        assert!(reachable.contains("a-deletes.parquet"));

        assert_eq!(source.walk_all_manifest_entries().await.unwrap().len(), 1);
        assert_eq!(&source.load_state().await.unwrap(), source.state());
    }

    #[tokio::test]
    async fn test_empty_table_state() {
        let source = InMemorySource::new(TableState::new("empty"));

        assert_eq!(source.current_snapshot_id().await.unwrap(), None);
        assert!(source.list_current_files().await.unwrap().is_empty());
        assert!(source.plan_all_reachable_file_paths().await.unwrap().is_empty());
    }
}
