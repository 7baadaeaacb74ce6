//! Timestamp-window inspection engine for timesift.
//!
//! This crate walks a directory tree in parallel and classifies every regular
//! file by whether its creation, access, or modification time falls inside a
//! caller-supplied [`TimeWindow`].
//!
//! # Overview
//!
//! `timesift-inspect` is responsible for traversal and classification. Key
//! properties:
//!
//! - **Parallel traversal** via jwalk/rayon
//! - **Per-path error isolation**: an unreadable file is reported and skipped,
//!   never aborting the scan
//! - **Progress updates** via broadcast channels
//! - **Independent categories**: a file may land in any subset of
//!   `created`/`accessed`/`modified`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::{Duration, SystemTime};
//! use timesift_inspect::{InspectConfig, Inspector, TimeWindow};
//!
//! // Everything touched in the last ten minutes.
//! let window = TimeWindow::ending_at(SystemTime::now(), Duration::from_secs(600));
//! let config = InspectConfig::new("/path/to/scan", window);
//!
//! let inspector = Inspector::new();
//! let report = inspector.inspect(&config).unwrap();
//!
//! println!("{} files modified in window", report.modified.len());
//! println!("{} paths could not be read", report.errors.len());
//! ```
//!
//! # Live error reporting
//!
//! Install a callback to hear about unreadable paths as they are found
//! (calls are serialized by the engine):
//!
//! ```rust,no_run
//! use std::time::{Duration, SystemTime};
//! use timesift_inspect::{InspectConfig, Inspector, TimeWindow};
//!
//! let inspector = Inspector::new()
//!     .on_error(|path, err| eprintln!("{}: {}", path.display(), err.message));
//!
//! let window = TimeWindow::ending_at(SystemTime::now(), Duration::from_secs(600));
//! let report = inspector.inspect(&InspectConfig::new("/var/log", window)).unwrap();
//! ```

mod inspector;
mod progress;
mod report;

pub use inspector::Inspector;
pub use progress::InspectProgress;
pub use report::{InspectReport, InspectStats};

// Re-export core types for convenience
pub use timesift_core::{
    InspectConfig, InspectConfigBuilder, InspectConfigBuilderError, InspectError, PathError,
    PathErrorKind, TimeWindow,
};
