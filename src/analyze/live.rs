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

use super::metrics::LiveTableMetrics;
use crate::source::records::{ContentType, FileEntry};

/// Summarize the files live in the current snapshot.
///
/// Sizes and record counts are split by content type; the net record count is
/// data records minus delete records, saturating at the `i64` bounds. An empty
/// slice yields all zeros.
pub fn aggregate_live_state(files: &[FileEntry]) -> LiveTableMetrics {
    let mut metrics = LiveTableMetrics::default();
    let mut data_records: u64 = 0;
    let mut delete_records: u64 = 0;

    for file in files {
        match file.content_type {
            ContentType::Data => {
                metrics.total_data_files += 1;
                metrics.data_file_size += file.size_bytes;
                data_records = data_records.saturating_add(file.record_count);
            }
            ContentType::Delete => {
                metrics.total_delete_files += 1;
                metrics.delete_file_size += file.size_bytes;
                delete_records = delete_records.saturating_add(file.record_count);
            }
        }
    }

    metrics.total_files_size = metrics.data_file_size + metrics.delete_file_size;
    metrics.record_count = i64::try_from(data_records)
        .unwrap_or(i64::MAX)
        .saturating_sub(i64::try_from(delete_records).unwrap_or(i64::MAX));
    metrics
}
