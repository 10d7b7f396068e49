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

use super::metrics::FileTypeMetrics;
use crate::source::records::{ContentType, FileEntry};

/// Per content type file count with record count and size statistics.
///
/// Averages truncate toward zero. A content type with no files produces no
/// entry; data files are listed before delete files.
pub fn aggregate_file_types(files: &[FileEntry]) -> Vec<FileTypeMetrics> {
    [ContentType::Data, ContentType::Delete]
        .into_iter()
        .filter_map(|content_type| {
            let group: Vec<&FileEntry> = files
                .iter()
                .filter(|f| f.content_type == content_type)
                .collect();
            file_type_stats(content_type, &group)
        })
        .collect()
}

fn file_type_stats(file_type: ContentType, group: &[&FileEntry]) -> Option<FileTypeMetrics> {
    let file_count = group.len() as u64;
    if file_count == 0 {
        return None;
    }

    let records = group.iter().map(|f| f.record_count);
    let sizes = group.iter().map(|f| f.size_bytes);

    Some(FileTypeMetrics {
        file_type,
        file_count,
        avg_record_count: records.clone().sum::<u64>() / file_count,
        max_record_count: records.clone().max().unwrap_or(0),
        min_record_count: records.min().unwrap_or(0),
        avg_file_size: sizes.clone().sum::<u64>() / file_count,
        max_file_size: sizes.clone().max().unwrap_or(0),
        min_file_size: sizes.min().unwrap_or(0),
    })
}
