pub mod catalog;
pub mod config;
pub mod log;
pub mod profile;
pub mod run;
pub mod stats;
pub mod task;
pub mod tick;

use chrono::{Local, NaiveDateTime};
use xptrack_core::{Config, FileOutcomeLog, JsonFileStore, Session};

pub type FileSession = Session<JsonFileStore, FileOutcomeLog>;

/// Open the session over the documents in the data directory.
pub fn open_session(config: &Config) -> Result<FileSession, Box<dyn std::error::Error>> {
    let store = JsonFileStore::open()?;
    let log = FileOutcomeLog::new(store.log_path());
    let session = Session::open(store, log, config, Local::now().date_naive())?;
    Ok(session)
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
