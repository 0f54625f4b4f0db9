//! # xptrack Core Library
//!
//! This library provides the engine behind xptrack, a personal gamification
//! tracker that turns scheduled real-world activities into XP and levels.
//! Front ends (the bundled CLI, or any GUI) are thin layers that call
//! [`Session::tick`] periodically and render what it returns.
//!
//! ## Architecture
//!
//! - **Progression**: pure XP-to-level arithmetic and progress bars
//! - **Decay**: per-day multiplicative decay of XP and love XP
//! - **Scheduler**: conflict-checked task placement and the task lifecycle
//!   sweep
//! - **Outcome log**: append-only text record of completions and failures
//! - **Session**: the tick loop tying everything together over a
//!   [`StateStore`]
//!
//! ## Key Components
//!
//! - [`Session`]: single owner of profile and schedule
//! - [`Schedule`]: ordered task collection with `add_batch` / `advance`
//! - [`StateStore`]: load/save abstraction ([`JsonFileStore`], [`MemoryStore`])
//! - [`Config`]: application configuration

pub mod decay;
pub mod error;
pub mod events;
pub mod outcome_log;
pub mod profile;
pub mod progression;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod task;

pub use decay::{DecayConfig, DecayEngine, DecayOutcome};
pub use error::{ConfigError, CoreError, SchedulingError, StoreError, ValidationError};
pub use events::Event;
pub use outcome_log::{FileOutcomeLog, MemoryOutcomeLog, OutcomeLog};
pub use profile::{Profile, LOVE_XP_MAX};
pub use progression::{level_for, progress_bar, xp_for_level, LevelEta, LevelInfo, ProgressBar};
pub use scheduler::{
    Advance, Confirmations, Conflict, Outcome, RewardRules, Schedule, SlotError, SlotOutcome,
    Transition,
};
pub use session::{ProfileStats, Prompt, Session, TickOutput};
pub use storage::{Config, JsonFileStore, MemoryStore, StateStore};
pub use task::{ScheduledTask, TaskCatalog, TaskStatus, TaskTemplate};
