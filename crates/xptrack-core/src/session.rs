//! The session loop.
//!
//! A [`Session`] exclusively owns the profile and the schedule for one
//! process run. Front ends call [`Session::tick`] on a timer and render the
//! returned [`TickOutput`].
//!
//! ## Tick
//!
//! ```text
//! decay -> day-start gate -> advance -> apply XP -> recompute level
//!       -> save schedule -> outcome log -> save profile -> TickOutput
//! ```
//!
//! Only documents that changed are written. A resolved task reaches the
//! store before the XP it earned, so a failed save can lose a credit but
//! never grant it twice. Whatever failed to save is retried on the next
//! tick.
//!
//! ## Questions
//!
//! The core never blocks on the user. Questions (start the day? did you
//! finish this task?) come back as [`Prompt`]s in the tick output; answers
//! are handed in with [`Session::answer_day_start`] and
//! [`Session::answer_task`] and take effect on the next tick. An ended task
//! without an answer is prompted again on every tick.
//!
//! The day-start answer only counts while the window (`start_hour` up to
//! `start_hour + 1`) is open. Past it the day is marked started with a
//! one-time XP penalty and scheduling stays closed, whatever was answered.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decay::DecayEngine;
use crate::error::{Result, SchedulingError, ValidationError};
use crate::events::Event;
use crate::outcome_log::OutcomeLog;
use crate::profile::{Profile, LOVE_XP_MAX};
use crate::progression::{
    average_daily_xp, days_to_next_level, progress_bar, LevelEta, LevelInfo, ProgressBar,
};
use crate::scheduler::{
    AwaitingConfirmation, Confirmations, Outcome, Schedule, SlotOutcome, Transition,
};
use crate::storage::{Config, RewardsConfig, StateStore};
use crate::task::{ScheduledTask, TaskCatalog};

/// A question the front end must put to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// Start the day (and unlock scheduling)?
    DayStart { date: NaiveDate, start_hour: u32 },
    /// Was this ended task completed?
    ConfirmTask {
        task_id: Uuid,
        task_name: String,
        ended_at: NaiveDateTime,
    },
}

impl From<AwaitingConfirmation> for Prompt {
    fn from(awaiting: AwaitingConfirmation) -> Self {
        Prompt::ConfirmTask {
            task_id: awaiting.task_id,
            task_name: awaiting.task_name,
            ended_at: awaiting.ended_at,
        }
    }
}

/// Derived numbers a front end typically shows next to the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub level: LevelInfo,
    pub xp_bar: ProgressBar,
    pub love_bar: ProgressBar,
    pub average_daily_xp: i64,
    pub eta: LevelEta,
}

impl ProfileStats {
    pub fn of(profile: &Profile) -> Self {
        let level = profile.level_info();
        Self {
            level,
            xp_bar: progress_bar(to_i64(level.xp_into_level), to_i64(level.xp_for_next)),
            love_bar: progress_bar(i64::from(profile.love_xp), i64::from(LOVE_XP_MAX)),
            average_daily_xp: average_daily_xp(&profile.xp_history),
            eta: days_to_next_level(profile.xp, &profile.xp_history),
        }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Everything a renderer needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    pub now: NaiveDateTime,
    pub current: Option<ScheduledTask>,
    pub next: Option<ScheduledTask>,
    pub profile: Profile,
    pub schedule: Schedule,
    pub stats: ProfileStats,
    pub prompts: Vec<Prompt>,
    pub events: Vec<Event>,
    /// Whether this tick wrote the documents back to the store.
    pub persisted: bool,
}

/// Single owner of the profile and schedule.
pub struct Session<S: StateStore, L: OutcomeLog> {
    store: S,
    log: L,
    profile: Profile,
    schedule: Schedule,
    catalog: TaskCatalog,
    decay: DecayEngine,
    rewards: RewardsConfig,
    answers: Confirmations,
    day_start_answer: Option<bool>,
    unlogged: Vec<Transition>,
    profile_dirty: bool,
    schedule_dirty: bool,
}

impl<S: StateStore, L: OutcomeLog> Session<S, L> {
    /// Load documents from `store`, creating a profile from `config` if
    /// there is none yet.
    pub fn open(store: S, log: L, config: &Config, today: NaiveDate) -> Result<Self> {
        let default = Profile::new(
            config.profile.username.clone(),
            config.profile.start_hour,
            today,
        );
        let mut profile = store.load_profile(default)?;
        profile.recompute_level();
        let schedule = store.load_schedule()?;
        let catalog = store.load_catalog()?;
        tracing::debug!(
            user = %profile.username,
            tasks = schedule.len(),
            templates = catalog.tasks.len(),
            "session opened"
        );

        Ok(Self {
            store,
            log,
            profile,
            schedule,
            catalog,
            decay: DecayEngine::with_config(config.decay),
            rewards: config.rewards.clone(),
            answers: Confirmations::new(),
            day_start_answer: None,
            unlogged: Vec::new(),
            profile_dirty: false,
            schedule_dirty: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn stats(&self) -> ProfileStats {
        ProfileStats::of(&self.profile)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run one full pass of the loop at wall-clock time `now`.
    pub fn tick(&mut self, now: NaiveDateTime) -> Result<TickOutput> {
        let today = now.date();
        let profile_before = self.profile.clone();
        let schedule_before = self.schedule.clone();
        let level_before = self.profile.level;
        let mut events = Vec::new();
        let mut prompts = Vec::new();

        if let Some(decay) = self.decay.apply(&mut self.profile, today) {
            self.profile.roll_days(decay.elapsed_days);
            events.push(Event::DecayApplied {
                elapsed_days: decay.elapsed_days,
                xp_before: decay.xp_before,
                xp_after: decay.xp_after,
                love_before: decay.love_before,
                love_after: decay.love_after,
                at: now,
            });
        }

        if let Some(prompt) = self.day_start_gate(now, &mut events) {
            prompts.push(prompt);
        }

        let advance = self
            .schedule
            .advance_with(now, &self.answers, &self.rewards.rules());

        for id in &advance.started {
            if let Some(task) = self.schedule.get(*id) {
                events.push(Event::TaskStarted {
                    task_id: task.id,
                    task_name: task.name.clone(),
                    at: now,
                });
            }
        }
        for transition in &advance.transitions {
            self.profile.apply_transition(transition);
            let amount = transition.delta.unsigned_abs();
            events.push(match transition.outcome {
                Outcome::Completed => Event::TaskCompleted {
                    task_id: transition.task_id,
                    task_name: transition.task_name.clone(),
                    xp_gained: amount,
                    at: now,
                },
                Outcome::Failed => Event::TaskFailed {
                    task_id: transition.task_id,
                    task_name: transition.task_name.clone(),
                    xp_lost: amount,
                    at: now,
                },
            });
        }
        prompts.extend(advance.awaiting.into_iter().map(Prompt::from));

        let level = self.profile.recompute_level();
        if level.level != level_before {
            tracing::info!(from = level_before, to = level.level, "level changed");
            events.push(Event::LevelChanged {
                from: level_before,
                to: level.level,
                at: now,
            });
        }

        self.unlogged.extend(advance.transitions);

        let schedule = &self.schedule;
        self.answers
            .retain(|id, _| schedule.get(*id).is_some_and(|task| !task.is_terminal()));

        self.profile_dirty |= self.profile != profile_before;
        self.schedule_dirty |= self.schedule != schedule_before;
        let persisted = self.persist()?;
        tracing::debug!(
            %now,
            prompts = prompts.len(),
            events = events.len(),
            persisted,
            "tick"
        );

        Ok(TickOutput {
            now,
            current: advance.current,
            next: advance.next,
            profile: self.profile.clone(),
            schedule: self.schedule.clone(),
            stats: self.stats(),
            prompts,
            events,
            persisted,
        })
    }

    /// Schedule catalog entry `template_index` at each of `hours` today.
    ///
    /// Refused as a whole while scheduling is locked for the day or when the
    /// index is out of range; otherwise every hour gets its own outcome.
    pub fn request_add(
        &mut self,
        template_index: usize,
        hours: &[u32],
        today: NaiveDate,
    ) -> Result<Vec<SlotOutcome>> {
        if !self.can_schedule(today) {
            return Err(SchedulingError::Locked.into());
        }
        let template = self.catalog.get(template_index)?.clone();
        let outcomes = self.schedule.add_batch(&template, hours, today)?;
        if outcomes.iter().any(SlotOutcome::is_accepted) {
            self.schedule_dirty = true;
            self.persist()?;
        }
        Ok(outcomes)
    }

    /// Record the yes/no answer for an ended (or running) task. It is
    /// applied on the next tick once the task has ended.
    pub fn answer_task(&mut self, task_id: Uuid, completed: bool) -> Result<(), ValidationError> {
        match self.schedule.get(task_id) {
            Some(task) if !task.is_terminal() => {
                self.answers.insert(task_id, completed);
                Ok(())
            }
            Some(task) => Err(ValidationError::InvalidValue {
                field: "task_id".to_string(),
                message: format!("'{}' is already resolved", task.name),
            }),
            None => Err(ValidationError::InvalidValue {
                field: "task_id".to_string(),
                message: format!("no scheduled task with id {task_id}"),
            }),
        }
    }

    /// Record the answer to the day-start question.
    pub fn answer_day_start(&mut self, start: bool) {
        self.day_start_answer = Some(start);
    }

    /// Whether add requests are accepted on `today`.
    pub fn can_schedule(&self, today: NaiveDate) -> bool {
        self.profile.can_schedule && self.profile.day_started == Some(today)
    }

    /// Apply a direct profile edit (rename, love XP, start hour) and save.
    pub fn update_profile<F: FnOnce(&mut Profile)>(&mut self, edit: F) -> Result<&Profile> {
        edit(&mut self.profile);
        self.profile.normalize();
        self.profile_dirty = true;
        self.persist()?;
        Ok(&self.profile)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn day_start_gate(&mut self, now: NaiveDateTime, events: &mut Vec<Event>) -> Option<Prompt> {
        let today = now.date();
        if self.profile.day_started == Some(today) {
            self.day_start_answer = None;
            return None;
        }

        self.profile.can_schedule = false;
        if now.hour() < self.profile.start_hour + 1 {
            match self.day_start_answer.take() {
                Some(true) => {
                    self.profile.day_started = Some(today);
                    self.profile.day_declined = None;
                    self.profile.can_schedule = true;
                    tracing::info!(%today, "day started");
                    events.push(Event::DayStarted { date: today });
                }
                Some(false) => {
                    self.profile.day_declined = Some(today);
                    tracing::info!(%today, "day start declined");
                    events.push(Event::DayDeclined { date: today });
                }
                None if self.profile.day_declined == Some(today) => {}
                None => {
                    return Some(Prompt::DayStart {
                        date: today,
                        start_hour: self.profile.start_hour,
                    })
                }
            }
            return None;
        }

        if let Some(start) = self.day_start_answer.take() {
            tracing::debug!(%today, start, "day-start answer arrived after the window");
        }
        let xp_lost = self
            .profile
            .apply_xp_penalty(self.rewards.missed_window_penalty);
        self.profile.day_started = Some(today);
        tracing::warn!(%today, xp_lost, "scheduling window missed");
        events.push(Event::SchedulingWindowMissed {
            date: today,
            xp_lost,
        });
        None
    }

    /// Write what is dirty: schedule, then the outcome log, then the profile.
    /// Flags stay set when a write fails.
    fn persist(&mut self) -> Result<bool> {
        let persisted = self.schedule_dirty || self.profile_dirty;
        if self.schedule_dirty {
            self.store.save_schedule(&self.schedule)?;
            self.schedule_dirty = false;
        }
        if let Some(first) = self.unlogged.first() {
            let date = first.at.date();
            self.log.append(&self.unlogged, date)?;
            self.unlogged.clear();
        }
        if self.profile_dirty {
            self.store.save_profile(&self.profile)?;
            self.profile_dirty = false;
        }
        Ok(persisted)
    }
}
