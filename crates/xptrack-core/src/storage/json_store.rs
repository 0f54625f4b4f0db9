//! JSON documents in the data directory.
//!
//! | file            | content                         |
//! |-----------------|---------------------------------|
//! | `profile.json`  | [`Profile`]                     |
//! | `schedule.json` | [`Schedule`] (array of tasks)   |
//! | `tasks.json`    | [`TaskCatalog`], never written  |
//!
//! Saves replace the whole document through a temporary file and a rename,
//! so a crash leaves either the old or the new document on disk.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{data_dir, StateStore};
use crate::error::{Result, StoreError};
use crate::profile::Profile;
use crate::scheduler::Schedule;
use crate::task::TaskCatalog;

const PROFILE_FILE: &str = "profile.json";
const SCHEDULE_FILE: &str = "schedule.json";
const CATALOG_FILE: &str = "tasks.json";
const LOG_FILE: &str = "xp_log.txt";

/// File-backed [`StateStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at [`data_dir`].
    pub fn open() -> Result<Self> {
        Ok(Self { dir: data_dir()? })
    }

    /// Store rooted at `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn profile_path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.dir.join(SCHEDULE_FILE)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(CATALOG_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// `None` when the file is absent, unreadable or does not parse.
    fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable document, using defaults");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed document, using defaults");
                None
            }
        }
    }

    fn write_document<T: Serialize>(path: &Path, document: &'static str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::SerializeFailed { document, source })?;
        let tmp = path.with_extension("json.tmp");
        let write = std::fs::write(&tmp, content).and_then(|()| std::fs::rename(&tmp, path));
        write.map_err(|source| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn load_profile(&self, default: Profile) -> Result<Profile> {
        let path = self.profile_path();
        if !path.exists() {
            Self::write_document(&path, "profile", &default)?;
            return Ok(default);
        }
        let mut profile = Self::read_document::<Profile>(&path).unwrap_or(default);
        profile.normalize();
        Ok(profile)
    }

    fn save_profile(&mut self, profile: &Profile) -> Result<()> {
        Self::write_document(&self.profile_path(), "profile", profile)
    }

    fn load_schedule(&self) -> Result<Schedule> {
        Ok(Self::read_document(&self.schedule_path()).unwrap_or_default())
    }

    fn save_schedule(&mut self, schedule: &Schedule) -> Result<()> {
        Self::write_document(&self.schedule_path(), "schedule", schedule)
    }

    fn load_catalog(&self) -> Result<TaskCatalog> {
        Ok(Self::read_document(&self.catalog_path()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskTemplate;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    #[test]
    fn first_load_writes_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::with_dir(dir.path());
        let profile = store.load_profile(Profile::new("Ada", 7, today())).unwrap();
        assert_eq!(profile.username, "Ada");
        assert!(store.profile_path().exists());
    }

    #[test]
    fn save_then_load_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::with_dir(dir.path());

        let mut profile = Profile::new("Ada", 7, today());
        profile.xp = 420;
        profile.love_xp = 33;
        profile.day_started = Some(today());
        profile.recompute_level();
        let mut schedule = Schedule::new();
        schedule
            .add_task(&TaskTemplate::new("Read", 45, 60), 9, today())
            .unwrap();

        store.save_profile(&profile).unwrap();
        store.save_schedule(&schedule).unwrap();

        let fallback = Profile::new("Other", 1, today());
        assert_eq!(store.load_profile(fallback).unwrap(), profile);
        assert_eq!(store.load_schedule().unwrap(), schedule);
        assert!(!dir.path().join("schedule.json.tmp").exists());
    }

    #[test]
    fn malformed_documents_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::with_dir(dir.path());
        std::fs::write(store.profile_path(), "{ not json").unwrap();
        std::fs::write(store.schedule_path(), "[{\"name\": 3}]").unwrap();
        std::fs::write(store.catalog_path(), "garbage").unwrap();

        let profile = store.load_profile(Profile::new("Fallback", 6, today())).unwrap();
        assert_eq!(profile.username, "Fallback");
        assert!(store.load_schedule().unwrap().is_empty());
        assert!(store.load_catalog().unwrap().tasks.is_empty());
    }

    #[test]
    fn catalog_is_read_but_never_created() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::with_dir(dir.path());
        assert!(store.load_catalog().unwrap().tasks.is_empty());
        assert!(!store.catalog_path().exists());

        std::fs::write(
            store.catalog_path(),
            r#"{"tasks":[{"name":"Gym","duration":60,"xp":120}]}"#,
        )
        .unwrap();
        let catalog = store.load_catalog().unwrap();
        assert_eq!(catalog.tasks, vec![TaskTemplate::new("Gym", 60, 120)]);
    }
}
