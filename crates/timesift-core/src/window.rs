//! Inclusive time windows for timestamp classification.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A closed interval `[start, end]` of absolute time.
///
/// Both bounds are inclusive: a window of zero duration admits exactly the
/// timestamps equal to its single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: SystemTime,
    end: SystemTime,
}

impl TimeWindow {
    /// Create a window from two absolute instants.
    ///
    /// The bounds may be given in either order; they are normalized so that
    /// `start() <= end()`.
    pub fn between(a: SystemTime, b: SystemTime) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Create a window of the given length ending at `end`.
    ///
    /// The lower bound saturates at the Unix epoch if `window` reaches
    /// further back than `end` allows.
    pub fn ending_at(end: SystemTime, window: Duration) -> Self {
        // checked_sub alone is not enough: on Unix, SystemTime can
        // represent pre-epoch instants, so the subtraction succeeds.
        let start = end
            .checked_sub(window)
            .map_or(UNIX_EPOCH, |s| s.max(UNIX_EPOCH));
        Self { start, end }
    }

    /// Create a window of the given length starting at `start`.
    pub fn starting_at(start: SystemTime, window: Duration) -> Self {
        let end = start.checked_add(window).unwrap_or(start);
        Self { start, end }
    }

    /// Lower bound of the window.
    pub fn start(&self) -> SystemTime {
        self.start
    }

    /// Upper bound of the window.
    pub fn end(&self) -> SystemTime {
        self.end
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        self.end.duration_since(self.start).unwrap_or(Duration::ZERO)
    }

    /// Check whether `t` falls inside the window, inclusive at both ends.
    pub fn contains(&self, t: SystemTime) -> bool {
        self.start <= t && t <= self.end
    }
}
