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

use super::metrics::PartitionMetrics;
use crate::source::records::{partition_label, ContentType, PartitionRow};
use std::collections::HashMap;

/// Roll partition rows up into one entry per distinct partition key.
///
/// Keys are compared structurally through their canonical JSON label, and
/// groups are emitted in the order their key is first seen.
pub fn aggregate_partitions(rows: &[PartitionRow]) -> Vec<PartitionMetrics> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut partitions: Vec<PartitionMetrics> = Vec::new();

    for row in rows {
        let slot = *index
            .entry(partition_label(&row.partition_key))
            .or_insert_with(|| {
                partitions.push(PartitionMetrics {
                    partition_key: row.partition_key.clone(),
                    data_file_count: 0,
                    delete_file_count: 0,
                    total_data_file_size: 0,
                    record_count: 0,
                    avg_file_size_per_partition: 0.0,
                });
                partitions.len() - 1
            });

        let partition = &mut partitions[slot];
        match row.content_type {
            ContentType::Data => {
                partition.data_file_count += 1;
                partition.total_data_file_size += row.size_bytes;
                partition.record_count += row.record_count;
            }
            ContentType::Delete => partition.delete_file_count += 1,
        }
    }

    for partition in partitions.iter_mut() {
        if partition.data_file_count > 0 {
            partition.avg_file_size_per_partition =
                partition.total_data_file_size as f64 / partition.data_file_count as f64;
        }
    }
    partitions
}
