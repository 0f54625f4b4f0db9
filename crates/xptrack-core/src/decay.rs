//! Inactivity decay for XP and love XP.
//!
//! Each whole day between `last_active` and today multiplies XP by the XP
//! retention factor and love XP by the (gentler) love retention factor.
//! Results are floored. Moving `last_active` to today right after applying
//! makes a second application on the same day a no-op.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Retention factors applied per elapsed day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Fraction of XP kept per idle day
    #[serde(default = "default_xp_retention")]
    pub xp_retention: f64,
    /// Fraction of love XP kept per idle day
    #[serde(default = "default_love_retention")]
    pub love_retention: f64,
}

fn default_xp_retention() -> f64 {
    0.9
}
fn default_love_retention() -> f64 {
    0.95
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            xp_retention: default_xp_retention(),
            love_retention: default_love_retention(),
        }
    }
}

/// What a decay pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecayOutcome {
    pub elapsed_days: i64,
    pub xp_before: u64,
    pub xp_after: u64,
    pub love_before: u32,
    pub love_after: u32,
}

/// Applies [`DecayConfig`] to profiles.
#[derive(Debug, Clone, Default)]
pub struct DecayEngine {
    config: DecayConfig,
}

impl DecayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    /// Whole days elapsed since `last_active`; never negative, so a clock
    /// that moved backwards does not inflate meters.
    pub fn elapsed_days(last_active: NaiveDate, today: NaiveDate) -> i64 {
        (today - last_active).num_days().max(0)
    }

    /// `value * retention^days`, floored.
    pub fn decayed(&self, value: u64, retention: f64, days: i64) -> u64 {
        let days = i32::try_from(days).unwrap_or(i32::MAX);
        (value as f64 * retention.clamp(0.0, 1.0).powi(days)).floor() as u64
    }

    /// Decay `profile` up to `today`.
    ///
    /// Returns `None` when no whole day has elapsed. The cached level is
    /// refreshed whenever XP changes.
    pub fn apply(&self, profile: &mut Profile, today: NaiveDate) -> Option<DecayOutcome> {
        let elapsed_days = Self::elapsed_days(profile.last_active, today);
        if elapsed_days == 0 {
            return None;
        }

        let xp_before = profile.xp;
        let love_before = profile.love_xp;
        profile.xp = self.decayed(xp_before, self.config.xp_retention, elapsed_days);
        profile.love_xp =
            self.decayed(u64::from(love_before), self.config.love_retention, elapsed_days) as u32;
        profile.last_active = today;
        profile.recompute_level();

        tracing::debug!(
            elapsed_days,
            xp_before,
            xp_after = profile.xp,
            love_before,
            love_after = profile.love_xp,
            "decay applied"
        );

        Some(DecayOutcome {
            elapsed_days,
            xp_before,
            xp_after: profile.xp,
            love_before,
            love_after: profile.love_xp,
        })
    }
}
