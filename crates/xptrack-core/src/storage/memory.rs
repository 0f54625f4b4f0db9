//! In-memory state store.

use super::StateStore;
use crate::error::Result;
use crate::profile::Profile;
use crate::scheduler::Schedule;
use crate::task::TaskCatalog;

/// Keeps documents in memory. Counts saves so tests can check that
/// unchanged ticks do not persist.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub profile: Option<Profile>,
    pub schedule: Option<Schedule>,
    pub catalog: TaskCatalog,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: TaskCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }
}

impl StateStore for MemoryStore {
    fn load_profile(&self, default: Profile) -> Result<Profile> {
        Ok(self.profile.clone().unwrap_or(default))
    }

    fn save_profile(&mut self, profile: &Profile) -> Result<()> {
        self.profile = Some(profile.clone());
        self.saves += 1;
        Ok(())
    }

    fn load_schedule(&self) -> Result<Schedule> {
        Ok(self.schedule.clone().unwrap_or_default())
    }

    fn save_schedule(&mut self, schedule: &Schedule) -> Result<()> {
        self.schedule = Some(schedule.clone());
        self.saves += 1;
        Ok(())
    }

    fn load_catalog(&self) -> Result<TaskCatalog> {
        Ok(self.catalog.clone())
    }
}
