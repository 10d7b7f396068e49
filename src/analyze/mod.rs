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

//! Metrics aggregation engine
//!
//! Pure aggregators over typed metadata records, and the [`Analyzer`] that
//! fetches those records from a [`MetadataSource`](crate::source::MetadataSource)
//! and merges the aggregates into [`TableMetrics`].
//!
//! ## Modules
//!
//! - [`live`] - totals over the files live in the current snapshot
//! - [`snapshot`] - change counters of the current snapshot
//! - [`history`] - bounded newest-first snapshot history
//! - [`partition`] - per-partition rollups
//! - [`file_type`] - per content type distribution statistics
//! - [`skew`] - coefficient of variation
//! - [`orphan`] - reachable files no manifest references
//! - [`expiration`] - snapshots past the retention threshold

pub mod analyze;
pub mod constants;
pub mod error;
pub mod expiration;
pub mod file_type;
pub mod history;
pub mod live;
pub mod metrics;
pub mod orphan;
pub mod partition;
pub mod skew;
pub mod snapshot;

pub use analyze::{Analyzer, AnalyzerBuilder};
pub use error::{MetricsError, MetricsResult};
pub use metrics::{
    ExpirationCandidate, FileTypeMetrics, HistoricalSnapshotRecord, LiveTableMetrics,
    PartitionMetrics, SnapshotMetrics, TableHealthMetrics, TableMetrics,
};
