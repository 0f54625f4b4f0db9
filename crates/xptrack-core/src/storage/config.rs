//! TOML-based application configuration.
//!
//! Stores:
//! - Defaults for new profiles (name, day start hour)
//! - Decay retention factors
//! - Reward and penalty tuning
//! - Session loop timing
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::decay::DecayConfig;
use crate::error::{ConfigError, Result};
use crate::scheduler::RewardRules;

/// Defaults used when a profile is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
}

/// Reward and penalty tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_failure_penalty_divisor")]
    pub failure_penalty_divisor: u64,
    /// Share of XP lost when the day-start window is missed.
    #[serde(default = "default_missed_window_penalty")]
    pub missed_window_penalty: f64,
}

/// Session loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub decay: DecayConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

// Default functions
fn default_username() -> String {
    "You".into()
}
fn default_start_hour() -> u32 {
    8
}
fn default_failure_penalty_divisor() -> u64 {
    2
}
fn default_missed_window_penalty() -> f64 {
    0.1
}
fn default_tick_interval_secs() -> u64 {
    5
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            start_hour: default_start_hour(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            failure_penalty_divisor: default_failure_penalty_divisor(),
            missed_window_penalty: default_missed_window_penalty(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

impl RewardsConfig {
    pub fn rules(&self) -> RewardRules {
        RewardRules {
            failure_penalty_divisor: self.failure_penalty_divisor,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("only leaf values can be set".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Reject values that would break the engine's invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        if self.profile.start_hour > 23 {
            return Err(invalid("profile.start_hour", "must be between 0 and 23"));
        }
        for (key, rate) in [
            ("decay.xp_retention", self.decay.xp_retention),
            ("decay.love_retention", self.decay.love_retention),
            ("rewards.missed_window_penalty", self.rewards.missed_window_penalty),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(key, "must be between 0.0 and 1.0"));
            }
        }
        if self.rewards.failure_penalty_divisor == 0 {
            return Err(invalid("rewards.failure_penalty_divisor", "must be at least 1"));
        }
        if self.session.tick_interval_secs == 0 {
            return Err(invalid("session.tick_interval_secs", "must be at least 1"));
        }
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `path`, writing the defaults there if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or holds
    /// invalid values, or if the defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Load from the data directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from disk, returning defaults on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unusable, using defaults");
            Self::default()
        })
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.profile.username, "You");
        assert_eq!(cfg.profile.start_hour, 8);
        assert_eq!(cfg.decay.xp_retention, 0.9);
        assert_eq!(cfg.decay.love_retention, 0.95);
        assert_eq!(cfg.rewards.failure_penalty_divisor, 2);
        assert_eq!(cfg.rewards.missed_window_penalty, 0.1);
        assert_eq!(cfg.session.tick_interval_secs, 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[profile]\nusername = \"Ada\"\n").unwrap();
        assert_eq!(cfg.profile.username, "Ada");
        assert_eq!(cfg.profile.start_hour, 8);
        assert_eq!(cfg.decay, DecayConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("profile.start_hour").as_deref(), Some("8"));
        assert_eq!(cfg.get("profile.username").as_deref(), Some("You"));
        assert_eq!(cfg.get("decay.xp_retention").as_deref(), Some("0.9"));
        assert!(cfg.get("profile.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("profile.start_hour", "6").unwrap();
        cfg.set("profile.username", "Ada").unwrap();
        cfg.set("decay.love_retention", "0.99").unwrap();
        assert_eq!(cfg.profile.start_hour, 6);
        assert_eq!(cfg.profile.username, "Ada");
        assert_eq!(cfg.decay.love_retention, 0.99);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("profile.nonexistent", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn set_rejects_invalid_values_and_keeps_state() {
        let mut cfg = Config::default();
        assert!(cfg.set("profile.start_hour", "24").is_err());
        assert!(cfg.set("profile.start_hour", "early").is_err());
        assert!(cfg.set("decay.xp_retention", "1.5").is_err());
        assert!(cfg.set("session", "3").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        std::fs::write(&path, "[rewards]\nfailure_penalty_divisor = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
