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

//! Defaults shared by the aggregators and the analyzer.

/// Snapshots returned by [`build_historical_series`](super::history::build_historical_series)
/// when the caller has no preference.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// History window requested by the [`Analyzer`](super::Analyzer) unless configured otherwise.
pub const DEFAULT_ANALYZER_HISTORY_LIMIT: usize = 20;

/// Snapshots older than this are candidates for expiration.
/// Default: 30 days
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Number of tables analyzed concurrently by `compute_many`.
pub const DEFAULT_PARALLELISM: usize = 1;

/// Bytes per mebibyte, used when rendering reports.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bytes per gibibyte, used when rendering reports.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
