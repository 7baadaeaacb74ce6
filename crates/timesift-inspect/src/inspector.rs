//! JWalk-based parallel timestamp inspector.

use std::collections::BTreeMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};

use dashmap::DashMap;
use jwalk::{Parallelism, WalkDir};
use rayon::prelude::*;
use tokio::sync::broadcast;

use timesift_core::{InspectConfig, InspectError, PathError, PathErrorKind, TimeWindow};

use crate::progress::InspectProgress;
use crate::report::{InspectReport, InspectStats};

type ErrorCallback = Box<dyn Fn(&Path, &PathError) + Send + Sync>;
type MatchCallback = Box<dyn Fn(&Path, &Metadata) + Send + Sync>;

/// Parallel directory inspector.
///
/// Walks a tree with jwalk, fans per-entry classification out over the rayon
/// pool, and accumulates hits into three concurrent maps. Per-path failures
/// are isolated: they are collected into the report (and forwarded to the
/// error callback if one is installed) without aborting the scan.
pub struct Inspector {
    progress_tx: broadcast::Sender<InspectProgress>,
    error_cb: Option<ErrorCallback>,
    match_cb: Option<MatchCallback>,
    // Serializes callback invocations from concurrent workers.
    callback_lock: Mutex<()>,
}

impl Inspector {
    /// Create a new inspector.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            progress_tx,
            error_cb: None,
            match_cb: None,
            callback_lock: Mutex::new(()),
        }
    }

    /// Install a callback invoked once per unreadable path.
    ///
    /// Calls are serialized by the inspector, so the callback does not need
    /// its own synchronization.
    pub fn on_error(mut self, f: impl Fn(&Path, &PathError) + Send + Sync + 'static) -> Self {
        self.error_cb = Some(Box::new(f));
        self
    }

    /// Install a callback invoked once per file that matched at least one
    /// category. Calls are serialized by the inspector.
    pub fn on_match(mut self, f: impl Fn(&Path, &Metadata) + Send + Sync + 'static) -> Self {
        self.match_cb = Some(Box::new(f));
        self
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<InspectProgress> {
        self.progress_tx.subscribe()
    }

    /// Inspect the tree under `config.root` against `config.window`.
    ///
    /// Fails with an [`InspectError`] only when the scan cannot begin at all
    /// (missing root, root is not a directory, root unreadable). Failures on
    /// individual paths are collected into the report instead.
    pub fn inspect(&self, config: &InspectConfig) -> Result<InspectReport, InspectError> {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| InspectError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(InspectError::NotADirectory { path: root_path });
        }

        tracing::debug!(root = %root_path.display(), "starting inspection");

        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(&root_path)
            .parallelism(parallelism)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(0)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        let acc = Accumulator::new(config.window);

        walker
            .into_iter()
            .par_bridge()
            .for_each(|entry_result| self.visit(entry_result, &acc, start));

        let mut report = acc.freeze();

        if config.propagate_ancestors {
            propagate_ancestors(&mut report.created, &root_path);
            propagate_ancestors(&mut report.accessed, &root_path);
            propagate_ancestors(&mut report.modified, &root_path);
        }

        report.stats.scan_duration = start.elapsed();

        tracing::debug!(
            files = report.stats.files_scanned,
            matches = report.total_matches(),
            errors = report.stats.error_count,
            "inspection complete"
        );

        Ok(report)
    }

    /// Process one walker entry.
    fn visit(
        &self,
        entry_result: Result<jwalk::DirEntry<((), ())>, jwalk::Error>,
        acc: &Accumulator,
        start: Instant,
    ) {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                let error = PathError::read(&path, err.to_string());
                self.record_error(acc, error);
                return;
            }
        };

        let file_type = entry.file_type();
        let path = entry.path();

        if file_type.is_dir() {
            acc.dirs.fetch_add(1, Ordering::Relaxed);
            return;
        }

        if file_type.is_symlink() {
            acc.symlinks.fetch_add(1, Ordering::Relaxed);
            if !path.exists() {
                let target = std::fs::read_link(&path)
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.record_error(acc, PathError::broken_symlink(&path, &target));
            }
            return;
        }

        if !file_type.is_file() {
            // Sockets, devices, etc. are not classified.
            return;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                let error = match err.io_error() {
                    Some(io_err) => PathError::metadata(&path, io_err),
                    None => PathError::new(&path, err.to_string(), PathErrorKind::Metadata),
                };
                self.record_error(acc, error);
                return;
            }
        };

        let matched = acc.classify(&path, &metadata);

        if matched {
            if let Some(cb) = &self.match_cb {
                let _guard = self
                    .callback_lock
                    .lock()
                    .unwrap_or_else(|e| e.into_inner());
                cb(&path, &metadata);
            }
        }

        let count = acc.files.fetch_add(1, Ordering::Relaxed);
        if count % 1000 == 0 {
            let _ = self.progress_tx.send(InspectProgress {
                files_scanned: acc.files.load(Ordering::Relaxed),
                dirs_scanned: acc.dirs.load(Ordering::Relaxed),
                errors_count: acc.error_count(),
                current_path: path,
                elapsed: start.elapsed(),
            });
        }
    }

    /// Record a per-path error and notify the callback, if any.
    fn record_error(&self, acc: &Accumulator, error: PathError) {
        tracing::warn!(path = %error.path.display(), kind = ?error.kind, "{}", error.message);

        if let Some(cb) = &self.error_cb {
            let _guard = self
                .callback_lock
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            cb(&error.path, &error);
        }

        let mut errors = acc.errors.lock().unwrap_or_else(|e| e.into_inner());
        errors.push(error);
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared mutable scan state, safe under concurrent contribution.
struct Accumulator {
    window: TimeWindow,
    created: DashMap<PathBuf, SystemTime>,
    accessed: DashMap<PathBuf, SystemTime>,
    modified: DashMap<PathBuf, SystemTime>,
    errors: Mutex<Vec<PathError>>,
    files: AtomicU64,
    dirs: AtomicU64,
    symlinks: AtomicU64,
}

impl Accumulator {
    fn new(window: TimeWindow) -> Self {
        Self {
            window,
            created: DashMap::new(),
            accessed: DashMap::new(),
            modified: DashMap::new(),
            errors: Mutex::new(Vec::new()),
            files: AtomicU64::new(0),
            dirs: AtomicU64::new(0),
            symlinks: AtomicU64::new(0),
        }
    }

    /// Test a file's timestamps against the window. Returns `true` if the
    /// file landed in at least one category.
    ///
    /// A timestamp the platform cannot supply skips that category only; the
    /// remaining categories still classify.
    fn classify(&self, path: &Path, metadata: &Metadata) -> bool {
        let mut matched = false;

        if let Some(t) = creation_time(metadata) {
            if self.window.contains(t) {
                self.created.insert(path.to_path_buf(), t);
                matched = true;
            }
        }
        if let Ok(t) = metadata.accessed() {
            if self.window.contains(t) {
                self.accessed.insert(path.to_path_buf(), t);
                matched = true;
            }
        }
        if let Ok(t) = metadata.modified() {
            if self.window.contains(t) {
                self.modified.insert(path.to_path_buf(), t);
                matched = true;
            }
        }

        matched
    }

    fn error_count(&self) -> u64 {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).len() as u64
    }

    /// Convert the concurrent state into a frozen, sorted report.
    fn freeze(self) -> InspectReport {
        let errors = self.errors.into_inner().unwrap_or_else(|e| e.into_inner());
        let stats = InspectStats {
            files_scanned: self.files.load(Ordering::Relaxed),
            dirs_scanned: self.dirs.load(Ordering::Relaxed),
            symlinks_seen: self.symlinks.load(Ordering::Relaxed),
            error_count: errors.len() as u64,
            scan_duration: std::time::Duration::ZERO, // set by the caller
        };

        InspectReport {
            created: self.created.into_iter().collect::<BTreeMap<_, _>>(),
            accessed: self.accessed.into_iter().collect::<BTreeMap<_, _>>(),
            modified: self.modified.into_iter().collect::<BTreeMap<_, _>>(),
            errors,
            stats,
        }
    }
}

/// Stamp every ancestor of each hit (strictly below `root`) with the newest
/// hit time seen in its subtree, so activity can be found by following the
/// max at any level.
fn propagate_ancestors(hits: &mut BTreeMap<PathBuf, SystemTime>, root: &Path) {
    let files: Vec<(PathBuf, SystemTime)> = hits.iter().map(|(p, t)| (p.clone(), *t)).collect();

    for (path, stamp) in files {
        for ancestor in path.ancestors().skip(1) {
            if ancestor == root || !ancestor.starts_with(root) {
                break;
            }
            match hits.get(ancestor) {
                // An ancestor already at or past this stamp means everything
                // above it is too.
                Some(&existing) if existing >= stamp => break,
                _ => {
                    hits.insert(ancestor.to_path_buf(), stamp);
                }
            }
        }
    }
}

/// Best-available creation time for a file.
///
/// Uses birth time where the platform supplies one; on Unix filesystems
/// without birth time, falls back to the inode change time, the nearest
/// analogue.
fn creation_time(metadata: &Metadata) -> Option<SystemTime> {
    if let Ok(t) = metadata.created() {
        return Some(t);
    }
    change_time(metadata)
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;

    let secs = metadata.ctime();
    if secs < 0 {
        return None;
    }
    let nanos = metadata.ctime_nsec().clamp(0, 999_999_999) as u32;
    Some(std::time::UNIX_EPOCH + std::time::Duration::new(secs as u64, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();

        temp
    }

    fn recent_window() -> TimeWindow {
        TimeWindow::ending_at(
            SystemTime::now() + Duration::from_secs(60),
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn test_fresh_files_match_recent_window() {
        let temp = create_test_tree();
        let config = InspectConfig::new(temp.path(), recent_window());

        let inspector = Inspector::new();
        let report = inspector.inspect(&config).unwrap();

        assert_eq!(report.stats.files_scanned, 3);
        assert_eq!(report.modified.len(), 3);
        assert!(report.errors.is_empty());

        // Traversal descended into the subdirectory.
        let root = temp.path().canonicalize().unwrap();
        assert!(
            report
                .modified
                .contains_key(&root.join("dir1/subdir/file3.txt"))
        );
    }

    #[test]
    fn test_past_window_matches_nothing() {
        let temp = create_test_tree();
        let window = TimeWindow::ending_at(
            UNIX_EPOCH + Duration::from_secs(1_000_000),
            Duration::from_secs(1_000_000),
        );
        let config = InspectConfig::new(temp.path(), window);

        let report = Inspector::new().inspect(&config).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.stats.files_scanned, 3);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        let config = InspectConfig::new(&missing, recent_window());

        let err = Inspector::new().inspect(&config).unwrap_err();
        assert!(matches!(err, InspectError::NotFound { .. }));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "not a dir").unwrap();
        let config = InspectConfig::new(&file, recent_window());

        let err = Inspector::new().inspect(&config).unwrap_err();
        assert!(matches!(err, InspectError::NotADirectory { .. }));
    }

    #[test]
    fn test_propagate_ancestors() {
        let root = PathBuf::from("/scan");
        let mut hits = BTreeMap::new();
        hits.insert(
            PathBuf::from("/scan/a/b/file.txt"),
            UNIX_EPOCH + Duration::from_secs(100),
        );
        hits.insert(
            PathBuf::from("/scan/a/other.txt"),
            UNIX_EPOCH + Duration::from_secs(50),
        );

        propagate_ancestors(&mut hits, &root);

        // Each level carries the max of its subtree; the root itself is
        // never stamped.
        assert_eq!(
            hits.get(&PathBuf::from("/scan/a/b")),
            Some(&(UNIX_EPOCH + Duration::from_secs(100)))
        );
        assert_eq!(
            hits.get(&PathBuf::from("/scan/a")),
            Some(&(UNIX_EPOCH + Duration::from_secs(100)))
        );
        assert!(!hits.contains_key(&PathBuf::from("/scan")));
    }

    #[test]
    fn test_creation_time_available() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f.txt");
        fs::write(&file, "x").unwrap();

        let metadata = fs::metadata(&file).unwrap();
        assert!(creation_time(&metadata).is_some());
    }
}
