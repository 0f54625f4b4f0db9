use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every state change made by a tick produces an Event.
/// Front ends render them; nothing in the core reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DecayApplied {
        elapsed_days: i64,
        xp_before: u64,
        xp_after: u64,
        love_before: u32,
        love_after: u32,
        at: NaiveDateTime,
    },
    /// The user started their day; scheduling is open.
    DayStarted {
        date: NaiveDate,
    },
    /// The user declined to start their day; scheduling stays closed.
    DayDeclined {
        date: NaiveDate,
    },
    /// The day-start window passed without an answer.
    SchedulingWindowMissed {
        date: NaiveDate,
        xp_lost: u64,
    },
    TaskStarted {
        task_id: Uuid,
        task_name: String,
        at: NaiveDateTime,
    },
    TaskCompleted {
        task_id: Uuid,
        task_name: String,
        xp_gained: u64,
        at: NaiveDateTime,
    },
    TaskFailed {
        task_id: Uuid,
        task_name: String,
        xp_lost: u64,
        at: NaiveDateTime,
    },
    LevelChanged {
        from: u32,
        to: u32,
        at: NaiveDateTime,
    },
}
