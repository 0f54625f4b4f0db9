//! Lifecycle sweep over the schedule.
//!
//! One call to [`Schedule::advance`] walks every task in schedule order and
//! decides what changes, then applies all changes in a second pass. Tasks
//! whose interval has ended need an explicit yes/no answer; until one is
//! supplied they stay where they are and are reported as awaiting, on every
//! sweep, so the front end keeps asking.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Schedule;
use crate::task::{ScheduledTask, TaskStatus};

/// Completion answers keyed by task id.
pub type Confirmations = HashMap<Uuid, bool>;

/// Terminal outcome of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Failed,
}

impl Outcome {
    pub fn status(&self) -> TaskStatus {
        match self {
            Outcome::Completed => TaskStatus::Completed,
            Outcome::Failed => TaskStatus::Failed,
        }
    }
}

/// A resolved task and the XP it is worth, ready for the profile and the
/// outcome log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub at: NaiveDateTime,
    pub task_id: Uuid,
    pub task_name: String,
    /// Signed XP change: the task's value on completion, minus the
    /// penalty on failure.
    pub delta: i64,
    pub outcome: Outcome,
}

/// How failures are priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRules {
    /// Failing a task costs `xp_value / failure_penalty_divisor` (floored)
    #[serde(default = "default_failure_penalty_divisor")]
    pub failure_penalty_divisor: u64,
}

fn default_failure_penalty_divisor() -> u64 {
    2
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            failure_penalty_divisor: default_failure_penalty_divisor(),
        }
    }
}

impl RewardRules {
    pub fn delta(&self, task: &ScheduledTask, outcome: Outcome) -> i64 {
        let amount = match outcome {
            Outcome::Completed => task.xp_value,
            Outcome::Failed => task.xp_value / self.failure_penalty_divisor.max(1),
        };
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        match outcome {
            Outcome::Completed => amount,
            Outcome::Failed => -amount,
        }
    }
}

/// An ended task still waiting for its yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitingConfirmation {
    pub task_id: Uuid,
    pub task_name: String,
    pub ended_at: NaiveDateTime,
}

/// Everything one sweep found and changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// First non-terminal task whose interval contains `now`
    pub current: Option<ScheduledTask>,
    /// First pending task, in schedule order, that has not started yet
    pub next: Option<ScheduledTask>,
    /// Tasks moved to in-progress by this sweep
    pub started: Vec<Uuid>,
    pub transitions: Vec<Transition>,
    pub awaiting: Vec<AwaitingConfirmation>,
}

enum Step {
    Start(usize),
    Resolve(usize, Outcome),
}

impl Schedule {
    /// Sweep with the default reward rules.
    pub fn advance(&mut self, now: NaiveDateTime, answers: &Confirmations) -> Advance {
        self.advance_with(now, answers, &RewardRules::default())
    }

    /// Move every task as far through its lifecycle as `now` and `answers`
    /// allow. Terminal tasks are never touched.
    pub fn advance_with(
        &mut self,
        now: NaiveDateTime,
        answers: &Confirmations,
        rules: &RewardRules,
    ) -> Advance {
        let mut steps = Vec::new();
        let mut current = None;
        let mut next = None;
        let mut awaiting = Vec::new();

        for (index, task) in self.tasks().iter().enumerate() {
            if task.is_terminal() {
                continue;
            }
            if task.contains(now) {
                if task.status == TaskStatus::Pending {
                    steps.push(Step::Start(index));
                }
                current.get_or_insert(index);
            } else if task.has_ended(now) {
                match answers.get(&task.id) {
                    Some(&done) => {
                        let outcome = if done { Outcome::Completed } else { Outcome::Failed };
                        steps.push(Step::Resolve(index, outcome));
                    }
                    None => awaiting.push(AwaitingConfirmation {
                        task_id: task.id,
                        task_name: task.name.clone(),
                        ended_at: task.end(),
                    }),
                }
            } else if task.status == TaskStatus::Pending && next.is_none() {
                next = Some(index);
            }
        }

        let mut started = Vec::new();
        let mut transitions = Vec::new();
        let tasks = self.tasks_mut();
        for step in steps {
            match step {
                Step::Start(index) => {
                    let task = &mut tasks[index];
                    task.status = TaskStatus::InProgress;
                    tracing::info!(task = %task.name, "task started");
                    started.push(task.id);
                }
                Step::Resolve(index, outcome) => {
                    let task = &mut tasks[index];
                    debug_assert!(task.status.can_transition_to(&outcome.status()));
                    task.status = outcome.status();
                    let delta = rules.delta(task, outcome);
                    tracing::info!(task = %task.name, ?outcome, delta, "task resolved");
                    transitions.push(Transition {
                        at: now,
                        task_id: task.id,
                        task_name: task.name.clone(),
                        delta,
                        outcome,
                    });
                }
            }
        }

        let tasks = self.tasks();
        Advance {
            current: current.map(|i| tasks[i].clone()),
            next: next.map(|i| tasks[i].clone()),
            started,
            transitions,
            awaiting,
        }
    }
}
