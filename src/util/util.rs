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

use log::info;
use std::future::Future;
use std::time::Instant;

/// Run a synchronous step, logging its summary and duration.
///
/// The log line reads `"<metric_name> | <summary>, took=<ms>"`.
pub fn measure_dur<F, T>(metric_name: &str, operation: F, summary_fn: Option<fn(&T) -> String>) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = operation();
    let dur = start.elapsed();
    let log_line = summary_fn.map(|f| f(&result)).unwrap_or_default();
    info!("{} | {}, took={}", metric_name, log_line, dur.as_millis());
    result
}

/// Run an async step that returns a `Result`, logging its summary and duration.
///
/// The summary is only rendered for a successful result.
pub async fn measure_dur_async<F, Fut, T, E>(
    metric_name: &str,
    operation: F,
    summary_fn: Option<fn(&T) -> String>,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = operation().await;
    let dur = start.elapsed();
    let log_line = result
        .as_ref()
        .ok()
        .and_then(|r| summary_fn.map(|f| f(r)))
        .unwrap_or_default();
    info!("{} | {}, took={}", metric_name, log_line, dur.as_millis());
    result
}

/// Synchronous counterpart of [`measure_dur_async`].
pub fn measure_dur_with_error<F, T, E>(
    metric_name: &str,
    operation: F,
    summary_fn: Option<fn(&T) -> String>,
) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    let start = Instant::now();
    let result = operation();
    let dur = start.elapsed();
    let log_line = result
        .as_ref()
        .ok()
        .and_then(|r| summary_fn.map(|f| f(r)))
        .unwrap_or_default();
    info!("{} | {}, took={}", metric_name, log_line, dur.as_millis());
    result
}
