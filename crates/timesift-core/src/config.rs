//! Inspection configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::window::TimeWindow;

/// Configuration for a single inspection run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct InspectConfig {
    /// Root of the subtree to scan. Must exist and be a directory.
    pub root: PathBuf,

    /// Time window that file timestamps are tested against.
    pub window: TimeWindow,

    /// Follow symbolic links during traversal.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Number of threads for scanning (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Stamp ancestor directories of each hit with the newest hit time,
    /// so activity can be found by following the max at any level.
    #[builder(default = "false")]
    #[serde(default)]
    pub propagate_ancestors: bool,
}

fn default_true() -> bool {
    true
}

impl InspectConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.window.is_none() {
            return Err("Time window is required".to_string());
        }
        Ok(())
    }
}

impl InspectConfig {
    /// Create a new config builder.
    pub fn builder() -> InspectConfigBuilder {
        InspectConfigBuilder::default()
    }

    /// Create a simple config for scanning a path against a window.
    pub fn new(root: impl Into<PathBuf>, window: TimeWindow) -> Self {
        Self {
            root: root.into(),
            window,
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            threads: 0,
            propagate_ancestors: false,
        }
    }
}
