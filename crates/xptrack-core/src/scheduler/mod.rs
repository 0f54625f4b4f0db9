//! The schedule: insertion with conflict detection, and the lifecycle sweep.
//!
//! The scheduler never performs I/O and never touches the profile. Adding
//! tasks returns per-slot outcomes; advancing returns the transitions the
//! caller must apply to the profile and hand to the outcome log.

mod advance;

pub use advance::{Advance, AwaitingConfirmation, Confirmations, Outcome, RewardRules, Transition};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::task::{ScheduledTask, TaskTemplate};

/// A requested slot overlaps a task already on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("'{requested}' at {start} overlaps '{existing_name}' ({existing_start})")]
pub struct Conflict {
    /// Name of the template that was being placed
    pub requested: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub existing_id: Uuid,
    pub existing_name: String,
    pub existing_start: NaiveDateTime,
}

/// Why a single slot could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("{0} is not an hour of the day")]
    InvalidHour(u32),
    #[error(transparent)]
    Conflict(#[from] Conflict),
}

/// Result for one requested hour of an add batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SlotOutcome {
    Accepted { hour: u32, task: ScheduledTask },
    Conflict { hour: u32, conflict: Conflict },
    InvalidHour { hour: u32 },
}

impl SlotOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SlotOutcome::Accepted { .. })
    }
}

/// Ordered collection of scheduled tasks, insertion order preserved.
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    tasks: Vec<ScheduledTask>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<ScheduledTask>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// First task, in schedule order, overlapping `[start, end)`. Every
    /// status counts, including terminal ones.
    pub fn find_conflict(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.overlaps(start, end))
    }

    /// Place `template` at `start` if the interval is free.
    pub fn insert(
        &mut self,
        template: &TaskTemplate,
        start: NaiveDateTime,
    ) -> Result<&ScheduledTask, Conflict> {
        let candidate = ScheduledTask::from_template(template, start);
        let end = candidate.end();
        if let Some(existing) = self.find_conflict(start, end) {
            return Err(Conflict {
                requested: template.name.clone(),
                start,
                end,
                existing_id: existing.id,
                existing_name: existing.name.clone(),
                existing_start: existing.start,
            });
        }
        let index = self.tasks.len();
        self.tasks.push(candidate);
        Ok(&self.tasks[index])
    }

    /// Place `template` at `start_hour:00` on `date`. Nothing is inserted
    /// for an hour outside `0..=23`.
    pub fn add_task(
        &mut self,
        template: &TaskTemplate,
        start_hour: u32,
        date: NaiveDate,
    ) -> Result<&ScheduledTask, SlotError> {
        let time =
            NaiveTime::from_hms_opt(start_hour, 0, 0).ok_or(SlotError::InvalidHour(start_hour))?;
        Ok(self.insert(template, date.and_time(time))?)
    }

    /// Evaluate each requested hour independently, in request order.
    ///
    /// Accepted slots are appended immediately, so later hours of the same
    /// batch can conflict with earlier ones. A rejected slot never affects
    /// the others.
    pub fn add_batch(
        &mut self,
        template: &TaskTemplate,
        hours: &[u32],
        date: NaiveDate,
    ) -> Result<Vec<SlotOutcome>, ValidationError> {
        template.validate()?;

        let mut outcomes = Vec::with_capacity(hours.len());
        for &hour in hours {
            let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                outcomes.push(SlotOutcome::InvalidHour { hour });
                continue;
            };
            let outcome = match self.insert(template, date.and_time(time)) {
                Ok(task) => {
                    tracing::info!(task = %task.name, start = %task.start, "task scheduled");
                    SlotOutcome::Accepted {
                        hour,
                        task: task.clone(),
                    }
                }
                Err(conflict) => {
                    tracing::debug!(%conflict, "slot rejected");
                    SlotOutcome::Conflict { hour, conflict }
                }
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [ScheduledTask] {
        &mut self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn hour_task() -> TaskTemplate {
        TaskTemplate::new("Study", 60, 100)
    }

    #[test]
    fn add_task_anchors_to_hour() {
        let mut schedule = Schedule::new();
        let task = schedule.add_task(&hour_task(), 9, date()).unwrap();
        assert_eq!(task.start, date().and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn same_hour_twice_in_one_batch_conflicts_with_itself() {
        let mut schedule = Schedule::new();
        let outcomes = schedule.add_batch(&hour_task(), &[9, 9], date()).unwrap();
        assert!(outcomes[0].is_accepted());
        match &outcomes[1] {
            SlotOutcome::Conflict { hour, conflict } => {
                assert_eq!(*hour, 9);
                assert_eq!(conflict.existing_name, "Study");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn batch_keeps_going_after_a_conflict() {
        let mut schedule = Schedule::new();
        schedule.add_task(&hour_task(), 10, date()).unwrap();
        let outcomes = schedule
            .add_batch(&hour_task(), &[9, 10, 24, 11], date())
            .unwrap();
        assert!(outcomes[0].is_accepted());
        assert!(matches!(outcomes[1], SlotOutcome::Conflict { hour: 10, .. }));
        assert_eq!(outcomes[2], SlotOutcome::InvalidHour { hour: 24 });
        assert!(outcomes[3].is_accepted());
        let hours: Vec<_> = schedule.tasks().iter().map(|t| t.start.format("%H").to_string()).collect();
        assert_eq!(hours, vec!["10", "09", "11"]);
    }

    #[test]
    fn add_task_rejects_hours_past_midnight() {
        let mut schedule = Schedule::new();
        assert_eq!(
            schedule.add_task(&hour_task(), 24, date()).unwrap_err(),
            SlotError::InvalidHour(24)
        );
        assert!(matches!(
            schedule.add_task(&hour_task(), 99, date()),
            Err(SlotError::InvalidHour(99))
        ));
        assert!(schedule.is_empty());
    }

    #[test]
    fn conflicts_are_symmetric() {
        let long = TaskTemplate::new("Long", 90, 10);
        let short = TaskTemplate::new("Short", 30, 10);

        // Long at 9:00-10:30, then short at 10:00.
        let mut first = Schedule::new();
        first.add_task(&long, 9, date()).unwrap();
        assert!(first.add_task(&short, 10, date()).is_err());

        // Short at 10:00-10:30, then long at 9:00.
        let mut second = Schedule::new();
        second.add_task(&short, 10, date()).unwrap();
        assert!(second.add_task(&long, 9, date()).is_err());
    }

    #[test]
    fn terminal_tasks_still_block_their_slot() {
        let mut schedule = Schedule::new();
        schedule.add_task(&hour_task(), 9, date()).unwrap();
        schedule.tasks_mut()[0].status = TaskStatus::Failed;
        assert!(schedule.add_task(&hour_task(), 9, date()).is_err());
    }

    #[test]
    fn adjacent_slots_do_not_conflict() {
        let mut schedule = Schedule::new();
        let outcomes = schedule.add_batch(&hour_task(), &[9, 10], date()).unwrap();
        assert!(outcomes.iter().all(SlotOutcome::is_accepted));
    }

    #[test]
    fn invalid_template_rejects_whole_batch() {
        let mut schedule = Schedule::new();
        let result = schedule.add_batch(&TaskTemplate::new("Zero", 0, 5), &[9], date());
        assert!(result.is_err());
        assert!(schedule.is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut schedule = Schedule::new();
        schedule.add_task(&hour_task(), 9, date()).unwrap();
        let json = serde_json::to_value(&schedule).unwrap();
        assert!(json.is_array());
        let back: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, schedule);
    }
}
