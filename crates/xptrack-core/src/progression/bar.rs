//! Fixed-width proportional progress bar.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells in a rendered bar.
pub const BAR_WIDTH: usize = 20;

/// Discrete fill of a [`BAR_WIDTH`]-cell bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub filled: usize,
    pub width: usize,
}

impl ProgressBar {
    /// Fill ratio in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        self.filled.min(self.width) as f64 / self.width as f64
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = self.filled.min(self.width);
        write!(
            f,
            "[{}{}]",
            "=".repeat(filled),
            " ".repeat(self.width - filled)
        )
    }
}

/// Proportional bar for `current` out of `max`.
///
/// A non-positive `max` yields an empty bar. Values outside `0..=max` are
/// clamped so the bar never over- or under-fills.
pub fn progress_bar(current: i64, max: i64) -> ProgressBar {
    if max <= 0 {
        return ProgressBar { filled: 0, width: BAR_WIDTH };
    }
    let current = current.clamp(0, max);
    let filled = (current as f64 / max as f64 * BAR_WIDTH as f64).floor() as usize;
    ProgressBar {
        filled: filled.min(BAR_WIDTH),
        width: BAR_WIDTH,
    }
}
