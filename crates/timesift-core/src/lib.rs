//! Core types for timesift.
//!
//! This crate provides the fundamental data structures shared across the
//! timesift workspace: the inclusive time window files are tested against,
//! the inspection configuration, and the two-tier error taxonomy.

mod config;
mod error;
mod window;

pub use config::{InspectConfig, InspectConfigBuilder, InspectConfigBuilderError};
pub use error::{InspectError, PathError, PathErrorKind};
pub use window::TimeWindow;
