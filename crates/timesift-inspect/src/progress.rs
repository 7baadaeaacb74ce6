//! Inspection progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Progress information during an inspection.
#[derive(Debug, Clone)]
pub struct InspectProgress {
    /// Number of files classified so far.
    pub files_scanned: u64,
    /// Number of directories traversed so far.
    pub dirs_scanned: u64,
    /// Number of per-path errors encountered so far.
    pub errors_count: u64,
    /// Current path being inspected.
    pub current_path: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl InspectProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            dirs_scanned: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items visited (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

impl Default for InspectProgress {
    fn default() -> Self {
        Self::new()
    }
}
