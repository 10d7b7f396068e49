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

use super::config::{SourceConfig, SourceType};
use super::document::DocumentSource;
use super::error::SourceResult;
use super::timeout::TimeoutSource;
use super::MetadataSource;
use crate::util::retry::RetryPolicy;
use std::sync::Arc;

/// Factory for creating metadata sources
pub struct SourceFactory;

impl SourceFactory {
    /// Create a metadata source from a configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The source configuration specifying location and options
    ///
    /// # Returns
    ///
    /// A thread-safe reference to the source, wrapped in a [`TimeoutSource`]
    /// when the configuration carries a timeout.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The location is neither a URL nor an existing local path
    /// * No object store can be built for the URL
    /// * The document cannot be read or is malformed
    pub async fn from_config(config: SourceConfig) -> SourceResult<Arc<dyn MetadataSource>> {
        let source: Arc<dyn MetadataSource> = match config.source_type {
            SourceType::Document => {
                let url = config.resolve_url()?;
                let retry = RetryPolicy::new(config.max_retries);
                Arc::new(DocumentSource::open_url(&url, &config.options, retry).await?)
            }
        };

        Ok(match config.timeout() {
            Some(timeout) => Arc::new(TimeoutSource::new(source, timeout)),
            None => source,
        })
    }
}
