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

//! Metadata sources
//!
//! A metadata source hands the engine the record streams of one loaded table:
//! current files, snapshot summaries, partition rows and, for orphan detection,
//! the reachable and manifest-referenced file paths. The engine only ever sees
//! the [`MetadataSource`] trait.
//!
//! ## Implementations
//!
//! - [`memory::InMemorySource`] - a table state already materialized (e.g. loaded from a catalog)
//! - [`document::DocumentSource`] - a JSON metadata document read through `object_store`
//! - [`timeout::TimeoutSource`] - bounds every call of another source with a timeout

pub mod config;
pub mod document;
pub mod error;
pub mod factory;
pub mod ingest;
pub mod memory;
pub mod records;
pub mod timeout;

pub use config::SourceConfig;
pub use document::DocumentSource;
pub use error::{SourceError, SourceResult};
pub use factory::SourceFactory;
pub use memory::{InMemorySource, TableState};
pub use records::{
    ContentType, CumulativeTotals, FileEntry, ManifestEntry, Operation, PartitionKey,
    PartitionRow, SnapshotCounters, SnapshotSummary,
};
pub use timeout::TimeoutSource;

use async_trait::async_trait;
use std::collections::HashSet;

/// Read access to the metadata of one loaded table.
///
/// Each call returns a fully materialized view. Implementations may be slow
/// (network, object storage) and may fail with a [`SourceError`]; the engine
/// propagates such failures unchanged and never retries them.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Display name of the table, e.g. `db.events`.
    fn table_name(&self) -> &str;

    /// Id of the current snapshot, `None` for a table with no commit yet.
    async fn current_snapshot_id(&self) -> SourceResult<Option<i64>>;

    /// Every file live in the current snapshot.
    async fn list_current_files(&self) -> SourceResult<Vec<FileEntry>>;

    /// Every snapshot known to the table metadata, in any order.
    async fn list_snapshots(&self) -> SourceResult<Vec<SnapshotSummary>>;

    /// One row per current file, carrying its partition key.
    async fn list_current_partitions(&self) -> SourceResult<Vec<PartitionRow>>;

    /// Paths planned by a scan of the current snapshot.
    async fn plan_all_reachable_file_paths(&self) -> SourceResult<HashSet<String>>;

    /// Every entry of every manifest of every snapshot.
    async fn walk_all_manifest_entries(&self) -> SourceResult<Vec<ManifestEntry>>;

    /// The whole table state from a single consistent read.
    ///
    /// Sources backed by one mutable artifact should override this so that
    /// every stream comes from the same version. The default gathers the
    /// individual streams concurrently.
    async fn load_state(&self) -> SourceResult<TableState> {
        let (current_snapshot_id, files, snapshots, manifest_entries) = futures::try_join!(
            self.current_snapshot_id(),
            self.list_current_files(),
            self.list_snapshots(),
            self.walk_all_manifest_entries(),
        )?;
        Ok(TableState {
            table_name: self.table_name().to_string(),
            current_snapshot_id,
            files,
            snapshots,
            manifest_entries,
        })
    }
}
