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

//! # Lake Vitals
//!
//! A Rust library for computing structural health metrics of tables stored in
//! snapshot-versioned, file-based table formats (data files, delete files,
//! manifests and an immutable chain of snapshots).
//!
//! Lake Vitals answers how much data a table holds right now, what the latest
//! write changed, how evenly data is spread across partitions, how files are
//! distributed by type and size, which files no manifest references and which
//! snapshots are old enough to expire. It only reads metadata; nothing is ever
//! compacted, expired or deleted.
//!
//! ## Features
//!
//! - **Live state**: file counts, sizes and net record count of the current snapshot
//! - **Snapshot analysis**: latest change counters and a bounded newest-first history
//! - **Partition analysis**: per-partition rollups and size skew (coefficient of variation)
//! - **File types**: count, size and record statistics for data and delete files
//! - **Housekeeping**: orphan file detection and age-based expiration candidates
//! - **Sources**: in-memory table state, or JSON metadata documents on any `object_store` backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lake_vitals::{Analyzer, SourceConfig, SourceFactory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let source = SourceFactory::from_config(
//!     SourceConfig::document("./warehouse/db/events/metadata.json"),
//! )
//! .await?;
//!
//! let analyzer = Analyzer::builder().with_history_limit(10).build()?;
//!
//! let metrics = analyzer.compute_table_metrics(source.as_ref()).await?;
//! println!("{}", metrics);
//!
//! let health = analyzer.table_health(source.as_ref()).await?;
//! println!("{}", health.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`analyze`] - Aggregators and the analyzer
//! - [`source`] - Metadata sources and the ingestion boundary
//! - [`util`] - Utility functions and helpers

pub mod analyze;
pub mod source;
pub mod util;

// Re-export commonly used types
pub use analyze::metrics::{TableHealthMetrics, TableMetrics};
pub use analyze::{Analyzer, MetricsError, MetricsResult};
pub use source::{MetadataSource, SourceConfig, SourceError, SourceFactory};
