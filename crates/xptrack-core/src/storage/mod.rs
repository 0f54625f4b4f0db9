//! Persistence: data directory, state stores, configuration.
//!
//! The session never touches files directly. It talks to a [`StateStore`],
//! so durable JSON documents in production and plain memory in tests are
//! interchangeable.

mod config;
mod json_store;
mod memory;

pub use config::{Config, ProfileConfig, RewardsConfig, SessionConfig};
pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{Result, StoreError};
use crate::profile::Profile;
use crate::scheduler::Schedule;
use crate::task::TaskCatalog;

/// Typed load/save of the session's documents.
///
/// Loads never fail on bad content: an absent or malformed document yields
/// the default and is repaired by the next save.
pub trait StateStore {
    /// Stored profile, or `default` when there is none (or it is unreadable).
    fn load_profile(&self, default: Profile) -> Result<Profile>;
    fn save_profile(&mut self, profile: &Profile) -> Result<()>;

    /// Stored schedule, or an empty one.
    fn load_schedule(&self) -> Result<Schedule>;
    fn save_schedule(&mut self, schedule: &Schedule) -> Result<()>;

    /// Task catalog; read-only from the core's point of view.
    fn load_catalog(&self) -> Result<TaskCatalog>;
}

/// Returns the xptrack data directory, creating it if needed.
///
/// `XPTRACK_DATA_DIR` wins when set. Otherwise `~/.config/xptrack`, or
/// `~/.config/xptrack-dev` with `XPTRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("XPTRACK_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("XPTRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("xptrack-dev")
            } else {
                base_dir.join("xptrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StoreError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
