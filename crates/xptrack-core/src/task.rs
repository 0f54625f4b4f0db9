//! Scheduled task types.
//!
//! A [`ScheduledTask`] is one placement of a catalog [`TaskTemplate`] on the
//! calendar. Its status follows a strict one-way lifecycle:
//!
//! ```text
//!   PENDING ───────> IN_PROGRESS ───────> COMPLETED
//!      │                  │
//!      │                  └─────────────> FAILED
//!      └──────────────────────────────> COMPLETED | FAILED
//! ```
//!
//! A pending task whose whole interval passed between two ticks resolves
//! directly. Completed and failed are terminal and are kept for history.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Lifecycle status of a scheduled task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting for its interval to start
    #[default]
    Pending,
    /// Wall clock is inside the task's interval
    InProgress,
    /// Confirmed done (terminal state)
    Completed,
    /// Confirmed not done (terminal state)
    Failed,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        match self {
            TaskStatus::Pending => matches!(
                to,
                TaskStatus::InProgress | TaskStatus::Completed | TaskStatus::Failed
            ),
            TaskStatus::InProgress => matches!(to, TaskStatus::Completed | TaskStatus::Failed),
            TaskStatus::Completed | TaskStatus::Failed => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Single-character marker used in listings and the outcome log.
    pub fn glyph(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "⏳",
            TaskStatus::InProgress => "🕒",
            TaskStatus::Completed => "✅",
            TaskStatus::Failed => "❌",
        }
    }
}

/// Catalog entry the user picks from when scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub name: String,
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(alias = "xp")]
    pub xp_value: u64,
}

impl TaskTemplate {
    pub fn new(name: impl Into<String>, duration_minutes: u32, xp_value: u64) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
            xp_value,
        }
    }

    /// Reject templates that cannot produce a valid interval.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration_minutes".to_string(),
                message: format!("template '{}' must last at least one minute", self.name),
            });
        }
        Ok(())
    }
}

/// Read-only task catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCatalog {
    #[serde(default)]
    pub tasks: Vec<TaskTemplate>,
}

impl TaskCatalog {
    pub fn get(&self, index: usize) -> Result<&TaskTemplate, ValidationError> {
        self.tasks.get(index).ok_or_else(|| ValidationError::OutOfBounds {
            collection: "task catalog".to_string(),
            index,
            len: self.tasks.len(),
        })
    }
}

/// One task instance placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: u32,
    pub xp_value: u64,
    pub start: NaiveDateTime,
    #[serde(default)]
    pub status: TaskStatus,
}

impl ScheduledTask {
    /// New pending task for `template` starting at `start`.
    pub fn from_template(template: &TaskTemplate, start: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: template.name.clone(),
            duration_minutes: template.duration_minutes,
            xp_value: template.xp_value,
            start,
            status: TaskStatus::Pending,
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// `now` lies in the half-open interval `[start, end)`.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now < self.end()
    }

    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        now >= self.end()
    }

    /// Half-open interval overlap; symmetric in its two operands.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for to in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            assert!(!TaskStatus::Completed.can_transition_to(&to));
            assert!(!TaskStatus::Failed.can_transition_to(&to));
        }
        assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::InProgress));
        assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Failed));
        assert!(!TaskStatus::InProgress.can_transition_to(&TaskStatus::Pending));
    }

    #[test]
    fn interval_is_half_open() {
        let task = ScheduledTask::from_template(&TaskTemplate::new("Gym", 60, 100), at(9, 0));
        assert_eq!(task.end(), at(10, 0));
        assert!(task.contains(at(9, 0)));
        assert!(task.contains(at(9, 59)));
        assert!(!task.contains(at(10, 0)));
        assert!(task.has_ended(at(10, 0)));
        assert!(!task.overlaps(at(10, 0), at(11, 0)));
        assert!(task.overlaps(at(9, 30), at(10, 30)));
    }

    #[test]
    fn zero_duration_template_is_invalid() {
        assert!(TaskTemplate::new("Nap", 0, 10).validate().is_err());
        assert!(TaskTemplate::new("Nap", 20, 10).validate().is_ok());
    }

    #[test]
    fn catalog_accepts_short_field_names() {
        let json = r#"{"tasks":[{"name":"Read","duration":30,"xp":50}]}"#;
        let catalog: TaskCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.tasks[0], TaskTemplate::new("Read", 30, 50));
        assert!(matches!(
            catalog.get(3),
            Err(ValidationError::OutOfBounds { index: 3, len: 1, .. })
        ));
    }
}
