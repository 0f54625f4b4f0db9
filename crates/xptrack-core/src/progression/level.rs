//! Level curve and level-up forecasting.
//!
//! ## Curve
//!
//! Advancing from level `L` to `L + 1` costs `100 * L + 200` XP, so every
//! level is more expensive than the one before it:
//!
//! ```text
//! L1 -> L2: 300    L2 -> L3: 400    L3 -> L4: 500 ...
//! ```

use serde::{Deserialize, Serialize};

/// Number of trailing days considered by the daily XP average.
pub const HISTORY_WINDOW: usize = 7;

/// XP required to advance *from* `level` to `level + 1`.
pub fn xp_for_level(level: u32) -> u64 {
    100 * u64::from(level) + 200
}

/// Resolved position on the level curve for an XP total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Current level (starts at 1)
    pub level: u32,
    /// XP accumulated since reaching `level`
    pub xp_into_level: u64,
    /// XP needed to go from `level` to `level + 1`
    pub xp_for_next: u64,
}

impl LevelInfo {
    /// XP still missing before the next level-up.
    pub fn xp_remaining(&self) -> u64 {
        self.xp_for_next.saturating_sub(self.xp_into_level)
    }
}

/// Resolve the level reached with `xp` total experience.
///
/// Starting at level 1, thresholds are subtracted while the remainder covers
/// them. Total for every `u64`, deterministic and monotonic in `xp`.
pub fn level_for(xp: u64) -> LevelInfo {
    let mut level: u32 = 1;
    let mut remaining = xp;
    loop {
        let needed = xp_for_level(level);
        if remaining < needed {
            break;
        }
        remaining -= needed;
        level = level.saturating_add(1);
    }
    LevelInfo {
        level,
        xp_into_level: remaining,
        xp_for_next: xp_for_level(level),
    }
}

/// Integer mean of the trailing daily XP window.
///
/// Only the last [`HISTORY_WINDOW`] entries count. An empty history averages
/// to 0 instead of dividing by zero.
pub fn average_daily_xp(history: &[i64]) -> i64 {
    let window = trailing_window(history);
    let sum: i64 = window.iter().sum();
    sum / window.len().max(1) as i64
}

/// Forecast of how long the next level-up will take at the current pace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelEta {
    /// Estimated days, rounded to one decimal
    Days { days: f64 },
    /// The recent average is zero or negative; no level-up in sight
    NegativeTrend,
}

/// Estimate the days until the next level from the daily XP history.
pub fn days_to_next_level(xp: u64, history: &[i64]) -> LevelEta {
    let window = trailing_window(history);
    let avg = window.iter().sum::<i64>() as f64 / window.len().max(1) as f64;
    if avg <= 0.0 {
        return LevelEta::NegativeTrend;
    }
    let remaining = level_for(xp).xp_remaining() as f64;
    LevelEta::Days {
        days: (remaining / avg * 10.0).round() / 10.0,
    }
}

fn trailing_window(history: &[i64]) -> &[i64] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_escalate() {
        assert_eq!(xp_for_level(1), 300);
        assert_eq!(xp_for_level(2), 400);
        assert_eq!(xp_for_level(10), 1200);
    }

    #[test]
    fn zero_xp_is_level_one() {
        let info = level_for(0);
        assert_eq!(info.level, 1);
        assert_eq!(info.xp_into_level, 0);
        assert_eq!(info.xp_for_next, 300);
    }

    #[test]
    fn just_below_first_threshold_stays_level_one() {
        let info = level_for(250);
        assert_eq!(info.level, 1);
        assert_eq!(info.xp_into_level, 250);
        assert_eq!(info.xp_remaining(), 50);
    }

    #[test]
    fn exact_threshold_advances_with_no_leftover() {
        let info = level_for(300);
        assert_eq!(info.level, 2);
        assert_eq!(info.xp_into_level, 0);
        assert_eq!(info.xp_for_next, 400);
    }

    #[test]
    fn cumulative_thresholds_land_on_boundaries() {
        let mut total = 0;
        for level in 1..=25 {
            total += xp_for_level(level);
            let info = level_for(total);
            assert_eq!(info.level, level + 1);
            assert_eq!(info.xp_into_level, 0);

            let below = level_for(total - 1);
            assert_eq!(below.level, level);
            assert_eq!(below.xp_into_level, xp_for_level(level) - 1);
        }
    }

    #[test]
    fn average_uses_trailing_seven_days() {
        assert_eq!(average_daily_xp(&[]), 0);
        assert_eq!(average_daily_xp(&[70, 0, 0, 0, 0, 0, 0]), 10);
        // The leading 1000 falls outside the window.
        assert_eq!(average_daily_xp(&[1000, 7, 7, 7, 7, 7, 7, 7]), 7);
        assert_eq!(average_daily_xp(&[-50, 0]), -25);
    }

    #[test]
    fn eta_reports_negative_trend() {
        assert_eq!(days_to_next_level(0, &[0; 7]), LevelEta::NegativeTrend);
        assert_eq!(days_to_next_level(0, &[-10, 5]), LevelEta::NegativeTrend);
        assert_eq!(days_to_next_level(0, &[]), LevelEta::NegativeTrend);
    }

    #[test]
    fn eta_divides_remaining_by_average() {
        // 100 XP/day, 300 XP missing at level 1.
        assert_eq!(
            days_to_next_level(0, &[100; 7]),
            LevelEta::Days { days: 3.0 }
        );
        // 250 into level 1 -> 50 left at 30/day = 1.666.. -> 1.7
        assert_eq!(
            days_to_next_level(250, &[30; 7]),
            LevelEta::Days { days: 1.7 }
        );
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in 0u64..2_000_000, b in 0u64..2_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for(lo).level <= level_for(hi).level);
        }

        #[test]
        fn progress_stays_below_threshold(xp in 0u64..2_000_000) {
            let info = level_for(xp);
            prop_assert!(info.level >= 1);
            prop_assert!(info.xp_into_level < info.xp_for_next);
        }
    }
}
