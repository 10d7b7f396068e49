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

use crate::source::SourceError;
use thiserror::Error;

/// Errors returned by the [`Analyzer`](super::Analyzer)
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A metadata source call failed; carried through unchanged.
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Invalid analyzer configuration: {0}")]
    Config(String),
}

impl MetricsError {
    /// True when the table metadata could not be loaded, as opposed to a
    /// table that simply has no data yet (which is never an error).
    pub fn is_source_error(&self) -> bool {
        matches!(self, MetricsError::Source(_))
    }
}

/// Result type for analyzer operations
pub type MetricsResult<T> = Result<T, MetricsError>;
