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

use super::error::{SourceError, SourceResult};
use super::ingest::{ingest_document, TableDocument};
use super::memory::TableState;
use super::records::{FileEntry, ManifestEntry, PartitionRow, SnapshotSummary};
use super::MetadataSource;
use crate::util::retry::RetryPolicy;
use crate::util::util::measure_dur_with_error;
use async_trait::async_trait;
use object_store::path::Path;
use object_store::{GetOptions, ObjectStore};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Metadata source backed by a JSON metadata document in object storage.
///
/// The document is re-read on every call so each record stream reflects the
/// table as it is at call time. [`MetadataSource::load_state`] reads it once
/// and hands back every stream from that single version. Transient read
/// failures are retried with the configured [`RetryPolicy`].
pub struct DocumentSource {
    table_name: String,
    store: Arc<dyn ObjectStore>,
    path: Path,
    retry: RetryPolicy,
    reads: AtomicUsize,
}

impl DocumentSource {
    /// Create a source with an explicit table name.
    pub fn new(store: Arc<dyn ObjectStore>, path: Path, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            store,
            path,
            retry: RetryPolicy::default(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Open the document at `path`, taking the table name from the document
    /// itself (or the file stem when the document has none).
    pub async fn open(
        store: Arc<dyn ObjectStore>,
        path: Path,
        retry: RetryPolicy,
    ) -> SourceResult<Self> {
        let mut source = Self::new(store, path, String::new()).with_retry(retry);
        let state = source.load().await?;
        info!(
            "Opened metadata document {} for table {}",
            source.path, state.table_name
        );
        source.table_name = state.table_name;
        Ok(source)
    }

    /// Open a document addressed by URL, building the store with `object_store::parse_url_opts`.
    pub async fn open_url(
        url: &Url,
        options: &HashMap<String, String>,
        retry: RetryPolicy,
    ) -> SourceResult<Self> {
        let (store, path) = object_store::parse_url_opts(url, options)?;
        Self::open(Arc::from(store), path, retry).await
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of object store reads issued so far, retries included.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Read and ingest the whole document.
    pub async fn load(&self) -> SourceResult<TableState> {
        let operation = format!("read {}", self.path);
        let bytes = self
            .retry
            .run(&operation, SourceError::is_transient, || async move {
                self.reads.fetch_add(1, Ordering::Relaxed);
                let result = self
                    .store
                    .get_opts(&self.path, GetOptions::default())
                    .await?;
                Ok::<_, SourceError>(result.bytes().await?)
            })
            .await?;
        debug!("Read {} bytes from {}", bytes.len(), self.path);

        measure_dur_with_error(
            "ingest_document",
            || {
                let document: TableDocument = serde_json::from_slice(&bytes)?;
                ingest_document(&document, &document_stem(&self.path))
            },
            Some(|state: &TableState| {
                format!(
                    "Ingested document, files={}, snapshots={}, manifest_entries={}",
                    state.files.len(),
                    state.snapshots.len(),
                    state.manifest_entries.len()
                )
            }),
        )
    }
}

/// File name of the document without its extension.
fn document_stem(path: &Path) -> String {
    path.filename()
        .map(|name| match name.split_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => name.to_string(),
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl MetadataSource for DocumentSource {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn current_snapshot_id(&self) -> SourceResult<Option<i64>> {
        Ok(self.load().await?.current_snapshot_id)
    }

    async fn list_current_files(&self) -> SourceResult<Vec<FileEntry>> {
        Ok(self.load().await?.files)
    }

    async fn list_snapshots(&self) -> SourceResult<Vec<SnapshotSummary>> {
        Ok(self.load().await?.snapshots)
    }

    async fn list_current_partitions(&self) -> SourceResult<Vec<PartitionRow>> {
        Ok(self.load().await?.partition_rows())
    }

    async fn plan_all_reachable_file_paths(&self) -> SourceResult<HashSet<String>> {
        Ok(self.load().await?.reachable_paths())
    }

    async fn walk_all_manifest_entries(&self) -> SourceResult<Vec<ManifestEntry>> {
        Ok(self.load().await?.manifest_entries)
    }

    async fn load_state(&self) -> SourceResult<TableState> {
        self.load().await
    }
}
