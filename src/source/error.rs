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

use thiserror::Error;

/// Errors raised by a metadata source while producing a record stream
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Metadata document error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed metadata record: {0}")]
    Malformed(String),

    #[error("Metadata source call '{operation}' timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u128 },

    #[error("Metadata source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Whether a retry of the same call could plausibly succeed.
    ///
    /// `Timeout` is raised by [`TimeoutSource`](super::TimeoutSource), which sits
    /// above the retrying reader, and is never retried.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
            ),
            SourceError::ObjectStore(object_store::Error::Generic { .. }) => {
                let msg = format!("{:?}", self);
                msg.contains("ConnectionReset")
                    || msg.contains("BrokenPipe")
                    || msg.contains("TimedOut")
            }
            _ => false,
        }
    }
}

/// Result type for metadata source operations
pub type SourceResult<T> = Result<T, SourceError>;
