//! The user's persistent progression state.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::progression::{level_for, LevelInfo, HISTORY_WINDOW};
use crate::scheduler::{Outcome, Transition};

/// Upper bound of the love XP meter.
pub const LOVE_XP_MAX: u32 = 200;

/// Progression state persisted in the profile document.
///
/// `level` is a cache of [`level_for`]`(xp)`; every method that touches `xp`
/// refreshes it before returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub love_xp: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Net XP per day, most recent last.
    #[serde(default = "default_history")]
    pub xp_history: Vec<i64>,
    pub last_active: NaiveDate,
    #[serde(default)]
    pub earned_xp_display: u64,
    #[serde(default)]
    pub lost_xp_display: u64,
    #[serde(default)]
    pub day_started: Option<NaiveDate>,
    #[serde(default)]
    pub day_declined: Option<NaiveDate>,
    #[serde(default)]
    pub can_schedule: bool,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
}

fn default_level() -> u32 {
    1
}
fn default_history() -> Vec<i64> {
    vec![0; HISTORY_WINDOW]
}
fn default_start_hour() -> u32 {
    8
}

impl Default for Profile {
    fn default() -> Self {
        Self::new("You", default_start_hour(), Local::now().date_naive())
    }
}

impl Profile {
    /// Fresh level-1 profile, active as of `today`.
    pub fn new(username: impl Into<String>, start_hour: u32, today: NaiveDate) -> Self {
        Self {
            username: username.into(),
            xp: 0,
            love_xp: 0,
            level: 1,
            xp_history: default_history(),
            last_active: today,
            earned_xp_display: 0,
            lost_xp_display: 0,
            day_started: None,
            day_declined: None,
            can_schedule: true,
            start_hour: start_hour.min(23),
        }
    }

    /// Refresh the cached level from `xp`.
    pub fn recompute_level(&mut self) -> LevelInfo {
        let info = level_for(self.xp);
        self.level = info.level;
        info
    }

    pub fn level_info(&self) -> LevelInfo {
        level_for(self.xp)
    }

    /// Apply a resolved task outcome to XP, the daily history and the
    /// display counters. Penalties never take XP below zero.
    pub fn apply_transition(&mut self, transition: &Transition) {
        let amount = transition.delta.unsigned_abs();
        match transition.outcome {
            Outcome::Completed => {
                self.xp = self.xp.saturating_add(amount);
                self.earned_xp_display = self.earned_xp_display.saturating_add(amount);
            }
            Outcome::Failed => {
                self.xp = self.xp.saturating_sub(amount);
                self.lost_xp_display = self.lost_xp_display.saturating_add(amount);
            }
        }
        self.record_daily_delta(transition.delta);
        self.recompute_level();
    }

    /// Shift the love XP meter by `delta`, clamped to `0..=LOVE_XP_MAX`.
    pub fn add_love_xp(&mut self, delta: i64) -> u32 {
        let next = (i64::from(self.love_xp) + delta).clamp(0, i64::from(LOVE_XP_MAX));
        self.love_xp = next as u32;
        self.love_xp
    }

    /// Remove `rate` (0.0..=1.0) of the current XP, flooring the result.
    /// Returns the XP actually lost.
    pub fn apply_xp_penalty(&mut self, rate: f64) -> u64 {
        let before = self.xp;
        self.xp = (before as f64 * (1.0 - rate.clamp(0.0, 1.0))).floor() as u64;
        let lost = before - self.xp;
        self.lost_xp_display = self.lost_xp_display.saturating_add(lost);
        self.record_daily_delta(-(lost as i64));
        self.recompute_level();
        lost
    }

    /// Open `elapsed_days` new days in the history window, one zero entry
    /// per day, and reset the per-day display counters.
    pub fn roll_days(&mut self, elapsed_days: i64) {
        if elapsed_days <= 0 {
            return;
        }
        let fresh = (elapsed_days as usize).min(HISTORY_WINDOW);
        self.xp_history.extend(std::iter::repeat(0).take(fresh));
        self.trim_history();
        self.earned_xp_display = 0;
        self.lost_xp_display = 0;
    }

    /// Clamp fields a hand-edited document may have pushed out of range.
    pub fn normalize(&mut self) {
        self.love_xp = self.love_xp.min(LOVE_XP_MAX);
        self.start_hour = self.start_hour.min(23);
        self.trim_history();
        self.recompute_level();
    }

    fn record_daily_delta(&mut self, delta: i64) {
        match self.xp_history.last_mut() {
            Some(today) => *today += delta,
            None => self.xp_history.push(delta),
        }
    }

    fn trim_history(&mut self) {
        let excess = self.xp_history.len().saturating_sub(HISTORY_WINDOW);
        self.xp_history.drain(..excess);
    }
}
