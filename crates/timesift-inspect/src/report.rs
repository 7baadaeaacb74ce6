//! Inspection results.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use timesift_core::PathError;

/// Summary statistics for an inspection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectStats {
    /// Total number of regular files classified.
    pub files_scanned: u64,
    /// Total number of directories traversed.
    pub dirs_scanned: u64,
    /// Total number of symbolic links seen.
    pub symlinks_seen: u64,
    /// Number of paths that could not be read.
    pub error_count: u64,
    /// Wall-clock duration of the scan.
    pub scan_duration: Duration,
}

/// Final results of an inspection.
///
/// Each of the three maps holds `path -> the timestamp that matched`, sorted
/// by path. A path appears in a map iff the corresponding timestamp fell
/// inside the configured window; the three memberships are independent.
/// Paths listed in `errors` appear in none of the maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    /// Files whose creation time fell inside the window.
    pub created: BTreeMap<PathBuf, SystemTime>,
    /// Files whose last-access time fell inside the window.
    pub accessed: BTreeMap<PathBuf, SystemTime>,
    /// Files whose last-modification time fell inside the window.
    pub modified: BTreeMap<PathBuf, SystemTime>,
    /// Per-path errors encountered during the scan.
    pub errors: Vec<PathError>,
    /// Summary statistics.
    pub stats: InspectStats,
}

impl InspectReport {
    /// Check if no file matched in any category.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.accessed.is_empty() && self.modified.is_empty()
    }

    /// Total number of matches across all three categories.
    ///
    /// A file matching in two categories counts twice; see
    /// [`matched_paths`](Self::matched_paths) for the deduplicated view.
    pub fn total_matches(&self) -> usize {
        self.created.len() + self.accessed.len() + self.modified.len()
    }

    /// Sorted, deduplicated union of all matched paths.
    pub fn matched_paths(&self) -> Vec<&PathBuf> {
        let mut paths: Vec<&PathBuf> = self
            .created
            .keys()
            .chain(self.accessed.keys())
            .chain(self.modified.keys())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Check if any per-path errors were recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
