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

use crate::source::records::{partition_label, PartitionRow};
use std::collections::HashMap;

/// Coefficient of variation: population standard deviation divided by the mean.
///
/// Returns 0.0 for an empty slice or a zero mean.
pub fn skewness(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Total bytes (data and delete files) per partition label, in first-seen order.
///
/// Delete-file bytes count toward their partition just like data bytes, so a
/// partition carrying large delete files reads as larger. A data-only measure
/// would report a different skew for tables with row-level deletes.
pub fn partition_total_sizes(rows: &[PartitionRow]) -> Vec<(String, u64)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sizes: Vec<(String, u64)> = Vec::new();

    for row in rows {
        let label = partition_label(&row.partition_key);
        match index.get(&label) {
            Some(&slot) => sizes[slot].1 += row.size_bytes,
            None => {
                index.insert(label.clone(), sizes.len());
                sizes.push((label, row.size_bytes));
            }
        }
    }
    sizes
}

/// Skewness of the per-partition total sizes, delete bytes included.
pub fn partition_skewness(rows: &[PartitionRow]) -> f64 {
    let sizes: Vec<f64> = partition_total_sizes(rows)
        .into_iter()
        .map(|(_, size)| size as f64)
        .collect();
    skewness(&sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::records::{ContentType, PartitionKey};
    use serde_json::json;

    fn row(region: &str, content_type: ContentType, size: u64) -> PartitionRow {
        let mut partition_key = PartitionKey::new();
        partition_key.insert("region".to_string(), json!(region));
        PartitionRow {
            partition_key,
            content_type,
            size_bytes: size,
            record_count: 1,
        }
    }

    #[test]
    fn test_skewness_edge_cases() {
        assert_eq!(skewness(&[]), 0.0);
        assert_eq!(skewness(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(skewness(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(skewness(&[42.0]), 0.0);
    }

    #[test]
    fn test_skewness_uses_population_variance() {
        // mean 2, population variance 2/3
        let value = skewness(&[1.0, 2.0, 3.0]);
        assert!((value - 0.408248).abs() < 1e-5);
    }

    #[test]
    fn test_partition_total_sizes_include_delete_bytes() {
        let sizes = partition_total_sizes(&[
            row("us", ContentType::Data, 100),
            row("eu", ContentType::Data, 300),
            row("us", ContentType::Delete, 20),
        ]);

        assert_eq!(
            sizes,
            vec![
                (r#"{"region":"us"}"#.to_string(), 120),
                (r#"{"region":"eu"}"#.to_string(), 300),
            ]
        );
    }

    #[test]
    fn test_partition_skewness() {
        let even = [
            row("us", ContentType::Data, 100),
            row("eu", ContentType::Data, 100),
        ];
        assert_eq!(partition_skewness(&even), 0.0);

        let uneven = [
            row("us", ContentType::Data, 100),
            row("eu", ContentType::Data, 200),
            row("apac", ContentType::Data, 300),
        ];
        assert!((partition_skewness(&uneven) - 0.408248).abs() < 1e-5);
        assert_eq!(partition_skewness(&[]), 0.0);
    }
}
