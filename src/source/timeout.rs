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
use super::memory::TableState;
use super::records::{FileEntry, ManifestEntry, PartitionRow, SnapshotSummary};
use super::MetadataSource;
use async_trait::async_trait;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Bounds every call of an inner source with a timeout.
///
/// An expired call fails with [`SourceError::Timeout`] and its future is
/// dropped, so no partial stream ever reaches the engine.
pub struct TimeoutSource {
    inner: Arc<dyn MetadataSource>,
    timeout: Duration,
}

impl TimeoutSource {
    pub fn new(inner: Arc<dyn MetadataSource>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, Fut>(&self, operation: &str, call: Fut) -> SourceResult<T>
    where
        Fut: Future<Output = SourceResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} on table {} timed out after {}ms",
                    operation,
                    self.inner.table_name(),
                    self.timeout.as_millis()
                );
                Err(SourceError::Timeout {
                    operation: operation.to_string(),
                    timeout_ms: self.timeout.as_millis(),
                })
            }
        }
    }
}

#[async_trait]
impl MetadataSource for TimeoutSource {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    async fn current_snapshot_id(&self) -> SourceResult<Option<i64>> {
        self.bounded("current_snapshot_id", self.inner.current_snapshot_id())
            .await
    }

    async fn list_current_files(&self) -> SourceResult<Vec<FileEntry>> {
        self.bounded("list_current_files", self.inner.list_current_files())
            .await
    }

    async fn list_snapshots(&self) -> SourceResult<Vec<SnapshotSummary>> {
        self.bounded("list_snapshots", self.inner.list_snapshots())
            .await
    }

    async fn list_current_partitions(&self) -> SourceResult<Vec<PartitionRow>> {
        self.bounded(
            "list_current_partitions",
            self.inner.list_current_partitions(),
        )
        .await
    }

    async fn plan_all_reachable_file_paths(&self) -> SourceResult<HashSet<String>> {
        self.bounded(
            "plan_all_reachable_file_paths",
            self.inner.plan_all_reachable_file_paths(),
        )
        .await
    }

    async fn walk_all_manifest_entries(&self) -> SourceResult<Vec<ManifestEntry>> {
        self.bounded(
            "walk_all_manifest_entries",
            self.inner.walk_all_manifest_entries(),
        )
        .await
    }

    async fn load_state(&self) -> SourceResult<TableState> {
        self.bounded("load_state", self.inner.load_state()).await
    }
}
