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

use crate::source::records::ManifestEntry;
use std::collections::HashSet;

/// Paths reachable from the current snapshot that no manifest entry references.
///
/// Purely metadata-derived; nothing is listed from storage. The result is
/// sorted so that repeated runs display identically.
pub fn find_orphan_files(
    reachable: &HashSet<String>,
    referenced: &HashSet<String>,
) -> Vec<String> {
    let mut orphans: Vec<String> = reachable.difference(referenced).cloned().collect();
    orphans.sort();
    orphans
}

/// Collect the distinct paths referenced by manifest entries.
pub fn referenced_paths(entries: &[ManifestEntry]) -> HashSet<String> {
    entries.iter().map(|e| e.file_path.clone()).collect()
}
