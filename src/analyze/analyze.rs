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

use super::constants::{
    DEFAULT_ANALYZER_HISTORY_LIMIT, DEFAULT_PARALLELISM, DEFAULT_RETENTION_DAYS,
};
use super::error::{MetricsError, MetricsResult};
use super::expiration::find_expirable_snapshots;
use super::file_type::aggregate_file_types;
use super::history::build_historical_series;
use super::live::aggregate_live_state;
use super::metrics::{
    ExpirationCandidate, FileTypeMetrics, HistoricalSnapshotRecord, LiveTableMetrics,
    PartitionMetrics, SnapshotMetrics, TableHealthMetrics, TableMetrics,
};
use super::orphan::{find_orphan_files, referenced_paths};
use super::partition::aggregate_partitions;
use super::skew::{partition_skewness, partition_total_sizes, skewness};
use super::snapshot::aggregate_snapshot_delta;
use crate::source::records::partition_label;
use crate::source::{MetadataSource, TableState};
use crate::util::util::{measure_dur, measure_dur_async};
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Builder for constructing an `Analyzer` instance.
///
/// # Examples
///
/// ```
/// use lake_vitals::analyze::Analyzer;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), lake_vitals::analyze::MetricsError> {
/// // Simple case with defaults
/// let analyzer = Analyzer::builder().build()?;
///
/// // Shorter history, stricter retention, four tables at a time
/// let analyzer = Analyzer::builder()
///     .with_history_limit(5)
///     .with_retention(Duration::days(7))
///     .with_parallelism(4)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct AnalyzerBuilder {
    history_limit: Option<usize>,
    retention: Option<Duration>,
    include_totals: Option<bool>,
    parallelism: Option<usize>,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            history_limit: None,
            retention: None,
            include_totals: None,
            parallelism: None,
        }
    }

    /// Number of snapshots kept in the history window.
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = Some(history_limit);
        self
    }

    /// Age after which a snapshot becomes an expiration candidate.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Whether history entries carry the cumulative totals of their summary.
    pub fn with_cumulative_totals(mut self, include_totals: bool) -> Self {
        self.include_totals = Some(include_totals);
        self
    }

    /// Sets how many tables `compute_many` analyzes concurrently.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Builds the `Analyzer` instance.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Config`] if the history limit or parallelism is
    /// zero, or the retention is not positive.
    pub fn build(self) -> MetricsResult<Analyzer> {
        let history_limit = self.history_limit.unwrap_or(DEFAULT_ANALYZER_HISTORY_LIMIT);
        if history_limit == 0 {
            return Err(MetricsError::Config(
                "history limit must be greater than 0".to_string(),
            ));
        }

        let retention = self
            .retention
            .unwrap_or_else(|| Duration::days(DEFAULT_RETENTION_DAYS));
        if retention <= Duration::zero() {
            return Err(MetricsError::Config(format!(
                "retention must be positive, got {}s",
                retention.num_seconds()
            )));
        }

        let parallelism = self.parallelism.unwrap_or(DEFAULT_PARALLELISM);
        if parallelism == 0 {
            return Err(MetricsError::Config(
                "parallelism must be greater than 0".to_string(),
            ));
        }

        Ok(Analyzer {
            history_limit,
            retention,
            include_totals: self.include_totals.unwrap_or(true),
            parallelism,
        })
    }
}

/// Computes health metrics for tables exposed through a [`MetadataSource`].
///
/// The analyzer holds configuration only. Every call fetches fresh record
/// streams from the source, aggregates them and returns plain values; nothing
/// is cached between calls, and a failing source call fails the whole
/// operation with the source's error unchanged.
///
/// # Examples
///
/// ```no_run
/// use lake_vitals::analyze::Analyzer;
/// use lake_vitals::source::{SourceConfig, SourceFactory};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let source = SourceFactory::from_config(
///     SourceConfig::document("s3://warehouse/db/events/metadata.json"),
/// )
/// .await?;
///
/// let analyzer = Analyzer::builder().build()?;
/// let metrics = analyzer.compute_table_metrics(source.as_ref()).await?;
/// println!("{}", metrics);
///
/// let orphans = analyzer.find_orphan_files(source.as_ref()).await?;
/// println!("{} orphan files", orphans.len());
/// # Ok(())
/// # }
/// ```
pub struct Analyzer {
    history_limit: usize,
    retention: Duration,
    include_totals: bool,
    parallelism: usize,
}

impl Analyzer {
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn include_totals(&self) -> bool {
        self.include_totals
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Compute the full metrics set of one table.
    ///
    /// The table state is loaded once through [`MetadataSource::load_state`]
    /// and fully materialized before any aggregation starts, so every metric
    /// describes the same version of the table.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Source`] with the first collaborator error.
    pub async fn compute_table_metrics(
        &self,
        source: &dyn MetadataSource,
    ) -> MetricsResult<TableMetrics> {
        let table_name = source.table_name().to_string();
        info!("Computing table metrics, table={}", table_name);

        let state = measure_dur_async(
            "fetch_metadata",
            || source.load_state(),
            Some(state_summary),
        )
        .await?;
        let partition_rows = state.partition_rows();
        let TableState {
            current_snapshot_id,
            files,
            snapshots,
            ..
        } = state;

        let live_table_metrics = measure_dur(
            "aggregate_live_state",
            || aggregate_live_state(&files),
            Some(|m: &LiveTableMetrics| {
                format!(
                    "Live state, data_files={}, delete_files={}, size={}",
                    m.total_data_files, m.total_delete_files, m.total_files_size
                )
            }),
        );

        let snapshot_metrics = measure_dur(
            "aggregate_snapshot_delta",
            || aggregate_snapshot_delta(current_snapshot_id, &snapshots),
            Some(|m: &SnapshotMetrics| format!("Snapshot delta, operation={:?}", m.operation)),
        );

        let historical_snapshots = measure_dur(
            "build_historical_series",
            || build_historical_series(&snapshots, self.history_limit, self.include_totals),
            Some(|h: &Vec<HistoricalSnapshotRecord>| format!("History, count={}", h.len())),
        );

        let partition_metrics = measure_dur(
            "aggregate_partitions",
            || aggregate_partitions(&partition_rows),
            Some(|p: &Vec<PartitionMetrics>| format!("Partitions, count={}", p.len())),
        );

        let file_metrics = measure_dur(
            "aggregate_file_types",
            || aggregate_file_types(&files),
            Some(|f: &Vec<FileTypeMetrics>| format!("File types, groups={}", f.len())),
        );

        Ok(TableMetrics {
            table_name,
            live_table_metrics,
            snapshot_metrics,
            partition_metrics,
            file_metrics,
            historical_snapshots,
        })
    }

    /// Paths reachable from the current snapshot that no manifest entry references, sorted.
    pub async fn find_orphan_files(&self, source: &dyn MetadataSource) -> MetricsResult<Vec<String>> {
        let (reachable, entries) = futures::try_join!(
            source.plan_all_reachable_file_paths(),
            source.walk_all_manifest_entries(),
        )?;

        let orphans = measure_dur(
            "find_orphan_files",
            || find_orphan_files(&reachable, &referenced_paths(&entries)),
            Some(|o: &Vec<String>| format!("Found orphan files, count={}", o.len())),
        );
        Ok(orphans)
    }

    /// Snapshots older than `threshold` (or the configured retention) as of now.
    pub async fn find_expirable_snapshots(
        &self,
        source: &dyn MetadataSource,
        threshold: Option<Duration>,
    ) -> MetricsResult<Vec<ExpirationCandidate>> {
        self.find_expirable_snapshots_at(source, threshold, Utc::now())
            .await
    }

    /// Like [`Analyzer::find_expirable_snapshots`], evaluated at `now`.
    pub async fn find_expirable_snapshots_at(
        &self,
        source: &dyn MetadataSource,
        threshold: Option<Duration>,
        now: DateTime<Utc>,
    ) -> MetricsResult<Vec<ExpirationCandidate>> {
        let snapshots = source.list_snapshots().await?;
        Ok(find_expirable_snapshots(
            &snapshots,
            threshold.unwrap_or(self.retention),
            now,
        ))
    }

    /// Coefficient of variation of the per-partition total sizes.
    pub async fn partition_skewness(&self, source: &dyn MetadataSource) -> MetricsResult<f64> {
        let rows = source.list_current_partitions().await?;
        Ok(partition_skewness(&rows))
    }

    /// Consolidated health view: sizes and file counts per partition, orphan
    /// files, partition skew and snapshots past retention.
    pub async fn table_health(
        &self,
        source: &dyn MetadataSource,
    ) -> MetricsResult<TableHealthMetrics> {
        info!("Computing table health, table={}", source.table_name());
        let state = measure_dur_async(
            "fetch_metadata",
            || source.load_state(),
            Some(state_summary),
        )
        .await?;
        let rows = state.partition_rows();
        let reachable = state.reachable_paths();
        let entries = &state.manifest_entries;
        let snapshots = &state.snapshots;

        let mut files_per_partition: BTreeMap<String, u64> = BTreeMap::new();
        for row in &rows {
            *files_per_partition
                .entry(partition_label(&row.partition_key))
                .or_insert(0) += 1;
        }

        let sizes = partition_total_sizes(&rows);
        let total_size_bytes: u64 = sizes.iter().map(|(_, size)| size).sum();
        let total_partitions = sizes.len() as u64;
        let average_partition_size_bytes = if total_partitions > 0 {
            total_size_bytes as f64 / total_partitions as f64
        } else {
            0.0
        };
        let size_values: Vec<f64> = sizes.iter().map(|(_, size)| *size as f64).collect();

        let health = TableHealthMetrics {
            total_size_bytes,
            total_files: rows.len() as u64,
            total_partitions,
            average_partition_size_bytes,
            files_per_partition,
            partition_skewness: skewness(&size_values),
            partition_sizes_bytes: sizes.into_iter().collect(),
            orphan_files: find_orphan_files(&reachable, &referenced_paths(entries)),
            snapshots_to_expire: find_expirable_snapshots(snapshots, self.retention, Utc::now()),
        };
        info!(
            "Table health, partitions={}, orphans={}, expirable={}, skew={:.4}",
            health.total_partitions,
            health.orphan_files.len(),
            health.snapshots_to_expire.len(),
            health.partition_skewness
        );
        Ok(health)
    }

    /// Compute metrics for many tables, `parallelism` at a time.
    ///
    /// Tables are independent: one failure does not affect the others. Results
    /// are returned in the order of `sources`.
    pub async fn compute_many(
        &self,
        sources: &[Arc<dyn MetadataSource>],
    ) -> Vec<MetricsResult<TableMetrics>> {
        info!(
            "Computing metrics for {} tables, parallelism={}",
            sources.len(),
            self.parallelism
        );
        stream::iter(sources)
            .map(|source| self.compute_table_metrics(source.as_ref()))
            .buffered(self.parallelism)
            .collect()
            .await
    }
}

fn state_summary(state: &TableState) -> String {
    format!(
        "Fetched metadata, current_snapshot={:?}, files={}, snapshots={}, manifest_entries={}",
        state.current_snapshot_id,
        state.files.len(),
        state.snapshots.len(),
        state.manifest_entries.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::records::{
        ContentType, CumulativeTotals, FileEntry, ManifestEntry, Operation, PartitionKey,
        PartitionRow, SnapshotCounters, SnapshotSummary,
    };
    use crate::source::{DocumentSource, InMemorySource, SourceError, SourceResult, TableState};
    use object_store::memory::InMemory;
    use object_store::path::Path;
    use object_store::{ObjectStore, PutOptions, PutPayload};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BASE: &str = "s3://bucket/db/events/data";

    fn file(name: &str, region: &str, content_type: ContentType, size: u64, records: u64) -> FileEntry {
        let mut partition_key = PartitionKey::new();
        partition_key.insert("region".to_string(), json!(region));
        FileEntry {
            file_path: format!("{}/{}", BASE, name),
            content_type,
            size_bytes: size,
            record_count: records,
            partition_key,
        }
    }

    fn snapshot(
        id: i64,
        parent_id: Option<i64>,
        operation: Operation,
        age: Duration,
        counters: SnapshotCounters,
    ) -> SnapshotSummary {
        let mut properties = HashMap::new();
        properties.insert("operation".to_string(), operation.as_str().to_string());
        SnapshotSummary {
            snapshot_id: id,
            parent_id,
            operation,
            committed_at: Utc::now() - age,
            manifest_list: Some(format!("s3://bucket/db/events/metadata/snap-{}.avro", id)),
            counters,
            totals: CumulativeTotals {
                total_data_files: id as u64,
                ..Default::default()
            },
            properties,
        }
    }

    fn events_state() -> TableState {
        let files = vec![
            file("a.parquet", "us", ContentType::Data, 100, 10),
            file("b.parquet", "us", ContentType::Data, 200, 20),
            file("c.parquet", "eu", ContentType::Data, 300, 30),
            file("c-deletes.parquet", "eu", ContentType::Delete, 10, 5),
        ];
        let snapshots = vec![
            snapshot(
                1,
                None,
                Operation::Append,
                Duration::days(40),
                SnapshotCounters {
                    added_data_files: 2,
                    added_records: 30,
                    ..Default::default()
                },
            ),
            snapshot(
                2,
                Some(1),
                Operation::Append,
                Duration::days(20),
                SnapshotCounters {
                    added_data_files: 1,
                    added_records: 30,
                    ..Default::default()
                },
            ),
            snapshot(
                3,
                Some(2),
                Operation::Delete,
                Duration::days(1),
                SnapshotCounters {
                    added_delete_files: 1,
                    deleted_records: 5,
                    changed_partition_count: 1,
                    ..Default::default()
                },
            ),
        ];
        let manifest_entries = ["a.parquet", "b.parquet", "c.parquet"]
            .iter()
            .map(|name| ManifestEntry {
                file_path: format!("{}/{}", BASE, name),
            })
            .collect();

        TableState::new("db.events")
            .with_current_snapshot(Some(3))
            .with_files(files)
            .with_snapshots(snapshots)
            .with_manifest_entries(manifest_entries)
    }

    /// Source whose snapshot listing is unavailable
    struct FailingSource;

    #[async_trait]
    impl MetadataSource for FailingSource {
        fn table_name(&self) -> &str {
            "db.broken"
        }

        async fn current_snapshot_id(&self) -> SourceResult<Option<i64>> {
            Ok(Some(1))
        }

        async fn list_current_files(&self) -> SourceResult<Vec<FileEntry>> {
            Ok(vec![])
        }

        async fn list_snapshots(&self) -> SourceResult<Vec<SnapshotSummary>> {
            Err(SourceError::Unavailable("catalog unreachable".to_string()))
        }

        async fn list_current_partitions(&self) -> SourceResult<Vec<PartitionRow>> {
            Ok(vec![])
        }

        async fn plan_all_reachable_file_paths(&self) -> SourceResult<HashSet<String>> {
            Ok(HashSet::new())
        }

        async fn walk_all_manifest_entries(&self) -> SourceResult<Vec<ManifestEntry>> {
            Err(SourceError::Unavailable("manifests unreachable".to_string()))
        }
    }

    /// Delays every file listing and counts calls
    struct DelayedSource {
        inner: InMemorySource,
        delay: std::time::Duration,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MetadataSource for DelayedSource {
        fn table_name(&self) -> &str {
            self.inner.table_name()
        }

        async fn current_snapshot_id(&self) -> SourceResult<Option<i64>> {
            self.inner.current_snapshot_id().await
        }

        async fn list_current_files(&self) -> SourceResult<Vec<FileEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.inner.list_current_files().await
        }

        async fn list_snapshots(&self) -> SourceResult<Vec<SnapshotSummary>> {
            self.inner.list_snapshots().await
        }

        async fn list_current_partitions(&self) -> SourceResult<Vec<PartitionRow>> {
            self.inner.list_current_partitions().await
        }

        async fn plan_all_reachable_file_paths(&self) -> SourceResult<HashSet<String>> {
            self.inner.plan_all_reachable_file_paths().await
        }

        async fn walk_all_manifest_entries(&self) -> SourceResult<Vec<ManifestEntry>> {
            self.inner.walk_all_manifest_entries().await
        }
    }

    #[test]
    fn test_builder_defaults() {
        let analyzer = Analyzer::builder().build().unwrap();

        assert_eq!(analyzer.history_limit(), DEFAULT_ANALYZER_HISTORY_LIMIT);
        assert_eq!(analyzer.retention(), Duration::days(DEFAULT_RETENTION_DAYS));
        assert!(analyzer.include_totals());
        assert_eq!(analyzer.parallelism(), DEFAULT_PARALLELISM);
    }

    #[test]
    fn test_builder_rejects_invalid_settings() {
        assert!(matches!(
            Analyzer::builder().with_history_limit(0).build(),
            Err(MetricsError::Config(_))
        ));
        assert!(matches!(
            Analyzer::builder().with_parallelism(0).build(),
            Err(MetricsError::Config(_))
        ));
        assert!(matches!(
            Analyzer::builder().with_retention(Duration::zero()).build(),
            Err(MetricsError::Config(_))
        ));
        assert!(matches!(
            Analyzer::builder().with_retention(Duration::days(-1)).build(),
            Err(MetricsError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_compute_table_metrics() {
        let source = InMemorySource::new(events_state());
        let metrics = Analyzer::builder()
            .build()
            .unwrap()
            .compute_table_metrics(&source)
            .await
            .unwrap();

        assert_eq!(metrics.table_name, "db.events");

        let live = &metrics.live_table_metrics;
        assert_eq!(live.total_data_files, 3);
        assert_eq!(live.total_delete_files, 1);
        assert_eq!(live.total_files_size, 610);
        assert_eq!(live.record_count, 55);

        assert_eq!(metrics.snapshot_metrics.operation, "delete");
        assert_eq!(metrics.snapshot_metrics.added_delete_files, 1);
        assert_eq!(metrics.snapshot_metrics.changed_partition_count, 1);

        assert_eq!(metrics.partition_metrics.len(), 2);
        let us = &metrics.partition_metrics[0];
        assert_eq!(us.label(), r#"{"region":"us"}"#);
        assert_eq!(us.data_file_count, 2);
        assert_eq!(us.total_data_file_size, 300);
        assert_eq!(us.avg_file_size_per_partition, 150.0);
        let eu = &metrics.partition_metrics[1];
        assert_eq!(eu.delete_file_count, 1);
        assert_eq!(eu.total_data_file_size, 300);

        assert_eq!(metrics.file_metrics.len(), 2);
        assert_eq!(metrics.file_metrics[0].file_type, ContentType::Data);
        assert_eq!(metrics.file_metrics[0].avg_file_size, 200);

        let ids: Vec<i64> = metrics
            .historical_snapshots
            .iter()
            .map(|h| h.snapshot_id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(
            metrics.historical_snapshots[0]
                .totals
                .map(|t| t.total_data_files),
            Some(3)
        );
    }

    #[tokio::test]
    async fn test_history_settings_are_applied() {
        let source = InMemorySource::new(events_state());
        let metrics = Analyzer::builder()
            .with_history_limit(2)
            .with_cumulative_totals(false)
            .build()
            .unwrap()
            .compute_table_metrics(&source)
            .await
            .unwrap();

        let ids: Vec<i64> = metrics
            .historical_snapshots
            .iter()
            .map(|h| h.snapshot_id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(metrics.historical_snapshots.iter().all(|h| h.totals.is_none()));
    }

    #[tokio::test]
    async fn test_empty_table_is_not_an_error() {
        let source = InMemorySource::new(TableState::new("db.empty"));
        let analyzer = Analyzer::builder().build().unwrap();
        let metrics = analyzer.compute_table_metrics(&source).await.unwrap();

        assert_eq!(metrics.live_table_metrics, LiveTableMetrics::default());
        assert!(metrics.snapshot_metrics.is_zero());
        assert!(metrics.partition_metrics.is_empty());
        assert!(metrics.file_metrics.is_empty());
        assert!(metrics.historical_snapshots.is_empty());
        assert_eq!(analyzer.partition_skewness(&source).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_source_errors_propagate_unchanged() {
        let analyzer = Analyzer::builder().build().unwrap();

        let err = analyzer
            .compute_table_metrics(&FailingSource)
            .await
            .unwrap_err();
        assert!(err.is_source_error());
        assert!(matches!(
            err,
            MetricsError::Source(SourceError::Unavailable(ref msg)) if msg == "catalog unreachable"
        ));

        assert!(analyzer.find_orphan_files(&FailingSource).await.is_err());
        assert!(analyzer
            .find_expirable_snapshots(&FailingSource, None)
            .await
            .is_err());
        assert!(analyzer.table_health(&FailingSource).await.is_err());
    }

    #[tokio::test]
    async fn test_find_orphan_files() {
        let source = InMemorySource::new(events_state());
        let orphans = Analyzer::builder()
            .build()
            .unwrap()
            .find_orphan_files(&source)
            .await
            .unwrap();

        assert_eq!(orphans, vec![format!("{}/c-deletes.parquet", BASE)]);
    }

    #[tokio::test]
    async fn test_find_expirable_snapshots() {
        let source = InMemorySource::new(events_state());
        let analyzer = Analyzer::builder().build().unwrap();

        let default_retention: Vec<i64> = analyzer
            .find_expirable_snapshots(&source, None)
            .await
            .unwrap()
            .iter()
            .map(|c| c.snapshot_id)
            .collect();
        assert_eq!(default_retention, vec![1]);

        let one_week: Vec<i64> = analyzer
            .find_expirable_snapshots(&source, Some(Duration::days(7)))
            .await
            .unwrap()
            .iter()
            .map(|c| c.snapshot_id)
            .collect();
        assert_eq!(one_week, vec![1, 2]);

        let long_ago = Utc::now() - Duration::days(365);
        assert!(analyzer
            .find_expirable_snapshots_at(&source, None, long_ago)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_huge_retention_keeps_every_snapshot() {
        let source = InMemorySource::new(events_state());
        let analyzer = Analyzer::builder()
            .with_retention(Duration::days(100_000_000))
            .build()
            .unwrap();

        let health = analyzer.table_health(&source).await.unwrap();
        assert!(health.snapshots_to_expire.is_empty());
        assert!(analyzer
            .find_expirable_snapshots(&source, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_document_is_read_once_per_analysis() {
        let document = json!({
            "table-name": "db.events",
            "current-snapshot-id": 1,
            "snapshots": [{"snapshot-id": 1, "timestamp-ms": 1714557600000_i64,
                           "summary": {"operation": "append", "added-data-files": "1"}}],
            "files": [{"file-path": "s3://b/t/data/a.parquet", "content": 0,
                       "file-size-in-bytes": 100, "record-count": 10,
                       "partition": {"region": "us"}}],
            "manifests": [{"manifest-path": "s3://b/t/metadata/m1.avro",
                           "entries": [{"file-path": "s3://b/t/data/a.parquet"}]}]
        });
        let store = InMemory::new();
        store
            .put_opts(
                &Path::from("t/metadata.json"),
                PutPayload::from(document.to_string().into_bytes()),
                PutOptions::default(),
            )
            .await
            .unwrap();
        let source =
            DocumentSource::new(Arc::new(store), Path::from("t/metadata.json"), "db.events");
        let analyzer = Analyzer::builder().build().unwrap();

        let metrics = analyzer.compute_table_metrics(&source).await.unwrap();
        assert_eq!(source.read_count(), 1);
        assert_eq!(metrics.live_table_metrics.total_data_files, 1);
        assert_eq!(metrics.partition_metrics.len(), 1);

        let health = analyzer.table_health(&source).await.unwrap();
        assert_eq!(source.read_count(), 2);
        assert_eq!(health.total_files, 1);
        assert!(health.orphan_files.is_empty());
    }

    #[tokio::test]
    async fn test_table_health() {
        let source = InMemorySource::new(events_state());
        let health = Analyzer::builder()
            .build()
            .unwrap()
            .table_health(&source)
            .await
            .unwrap();

        let us = r#"{"region":"us"}"#;
        let eu = r#"{"region":"eu"}"#;
        assert_eq!(health.total_size_bytes, 610);
        assert_eq!(health.total_files, 4);
        assert_eq!(health.total_partitions, 2);
        assert_eq!(health.average_partition_size_bytes, 305.0);
        assert_eq!(health.files_per_partition.get(us), Some(&2));
        assert_eq!(health.files_per_partition.get(eu), Some(&2));
        assert_eq!(health.partition_sizes_bytes.get(us), Some(&300));
        assert_eq!(health.partition_sizes_bytes.get(eu), Some(&310));
        assert!((health.partition_skewness - 5.0 / 305.0).abs() < 1e-9);
        assert_eq!(health.orphan_files.len(), 1);
        assert_eq!(health.snapshots_to_expire.len(), 1);
        assert_eq!(health.snapshots_to_expire[0].snapshot_id, 1);
    }

    #[tokio::test]
    async fn test_compute_many_preserves_input_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let slow: Arc<dyn MetadataSource> = Arc::new(DelayedSource {
            inner: InMemorySource::new(events_state()),
            delay: std::time::Duration::from_millis(50),
            calls: Arc::clone(&calls),
        });
        let fast: Arc<dyn MetadataSource> =
            Arc::new(InMemorySource::new(TableState::new("db.fast")));
        let broken: Arc<dyn MetadataSource> = Arc::new(FailingSource);

        let results = Analyzer::builder()
            .with_parallelism(3)
            .build()
            .unwrap()
            .compute_many(&[slow, broken, fast])
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().table_name, "db.events");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().table_name, "db.fast");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_repeated_calls_recompute() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = DelayedSource {
            inner: InMemorySource::new(events_state()),
            delay: std::time::Duration::from_millis(0),
            calls: Arc::clone(&calls),
        };
        let analyzer = Analyzer::builder().build().unwrap();

        let first = analyzer.compute_table_metrics(&source).await.unwrap();
        let second = analyzer.compute_table_metrics(&source).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
