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
use crate::util::retry::DEFAULT_MAX_RETRIES;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Metadata source type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// JSON metadata document read through object_store
    Document,
}

/// Configuration for building a metadata source
///
/// # Examples
///
/// ## Local metadata document
/// ```
/// use lake_vitals::source::SourceConfig;
///
/// let config = SourceConfig::document("/tmp/warehouse/events/metadata.json");
/// ```
///
/// ## Document on S3
/// ```
/// use lake_vitals::source::SourceConfig;
/// use std::time::Duration;
///
/// let config = SourceConfig::document("s3://my-bucket/warehouse/events/metadata.json")
///     .with_option("aws_region", "us-east-1")
///     .with_max_retries(5)
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    #[serde(rename = "type")]
    pub source_type: SourceType,

    /// URL (`s3://`, `file://`, `memory://`, ...) or local path of the document
    pub location: String,

    /// Options passed through to `object_store::parse_url_opts`
    #[serde(default)]
    pub options: HashMap<String, String>,

    /// Retries of transient read failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Per-call timeout; no timeout when absent
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_max_retries() -> usize {
    DEFAULT_MAX_RETRIES
}

impl SourceConfig {
    /// Configuration for a metadata document at `location`.
    pub fn document(location: impl Into<String>) -> Self {
        Self {
            source_type: SourceType::Document,
            location: location.into(),
            options: HashMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: None,
        }
    }

    /// Add an object_store option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: HashMap<String, String>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Resolve the location into a URL.
    ///
    /// Anything that does not parse as an absolute URL is treated as a local
    /// path, which must exist.
    pub fn resolve_url(&self) -> SourceResult<Url> {
        match Url::parse(&self.location) {
            // single letter schemes are windows drive letters
            Ok(url) if url.scheme().len() > 1 => Ok(url),
            _ => {
                let path = PathBuf::from(&self.location);
                let canonical = path.canonicalize().map_err(|e| {
                    SourceError::Config(format!(
                        "Failed to resolve path '{}': {} (path must exist)",
                        self.location, e
                    ))
                })?;
                Url::from_file_path(&canonical).map_err(|_| {
                    SourceError::Config(format!(
                        "Cannot convert path to URL: {}",
                        canonical.display()
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_document_defaults() {
        let config = SourceConfig::document("s3://bucket/t/metadata.json");
        assert_eq!(config.source_type, SourceType::Document);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!(config.options.is_empty());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_method_chaining() {
        let config = SourceConfig::document("s3://bucket/t/metadata.json")
            .with_option("aws_region", "eu-west-1")
            .with_max_retries(7)
            .with_timeout(Duration::from_millis(1500));

        assert_eq!(
            config.get_option("aws_region"),
            Some(&"eu-west-1".to_string())
        );
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_oversized_timeout_saturates() {
        let config =
            SourceConfig::document("s3://bucket/t/metadata.json").with_timeout(Duration::MAX);
        assert_eq!(config.timeout_ms, Some(u64::MAX));
    }

    #[test]
    fn test_with_options_overrides() {
        let mut extra = HashMap::new();
        extra.insert("aws_region".to_string(), "us-east-2".to_string());
        let config = SourceConfig::document("s3://bucket/m.json")
            .with_option("aws_region", "us-east-1")
            .with_options(extra);

        assert_eq!(
            config.get_option("aws_region"),
            Some(&"us-east-2".to_string())
        );
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: SourceConfig =
            serde_json::from_str(r#"{"type":"document","location":"memory:///m.json"}"#).unwrap();

        assert_eq!(config.location, "memory:///m.json");
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_config_serialization() {
        let config = SourceConfig::document("memory:///m.json").with_option("k", "v");
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("\"type\":\"document\""));
        let back: SourceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_resolve_url_keeps_urls() {
        let url = SourceConfig::document("s3://bucket/t/metadata.json")
            .resolve_url()
            .unwrap();
        assert_eq!(url.scheme(), "s3");
        assert_eq!(url.path(), "/t/metadata.json");
    }

    #[test]
    fn test_resolve_url_canonicalizes_local_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("metadata.json");
        fs::write(&file, "{}").unwrap();

        let url = SourceConfig::document(file.to_string_lossy())
            .resolve_url()
            .unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/metadata.json"));
    }

    #[test]
    fn test_resolve_url_missing_path() {
        let result = SourceConfig::document("/definitely/not/here/metadata.json").resolve_url();
        assert!(matches!(result, Err(SourceError::Config(_))));
    }
}
