//! Usage statistics.
//!
//! Accumulates counters from task-completion toggles and focus-session
//! completions, unlocks daily achievements, and rolls the daily counters
//! over when the stored last-active date falls behind today.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::store::StateRepo;
use crate::task::{TaskRecord, WEEK_MS};

/// Daily task-count thresholds and the achievement text each unlocks.
/// Append-only, deduplicated by exact text.
pub const ACHIEVEMENTS: [(u32, &str); 3] = [
    (1, "🌟 First task of the day completed!"),
    (5, "💪 5 tasks completed today!"),
    (10, "🚀 10 tasks completed today!"),
];

/// The persisted stats blob, original camelCase layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsState {
    pub tasks_today: u32,
    pub tasks_this_week: u32,
    pub current_streak: u32,
    pub pomodoros_today: u32,
    /// date-string -> completed-task count. A gross log: entries are
    /// incremented on completion but intentionally not decremented when a
    /// task is un-completed.
    pub daily_history: BTreeMap<String, u32>,
    pub achievements: Vec<String>,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            tasks_today: 0,
            tasks_this_week: 0,
            current_streak: 0,
            pomodoros_today: 0,
            daily_history: BTreeMap::new(),
            achievements: vec!["🎯 First task completed!".to_string()],
        }
    }
}

pub struct StatsTracker {
    state: StatsState,
    repo: StateRepo,
    clock: Arc<dyn Clock>,
}

impl StatsTracker {
    /// Load persisted stats and apply the daily rollover: when the stored
    /// last-active date differs from today, today's counters reset and the
    /// weekly count is recomputed from the task records; prior history
    /// days are left untouched.
    pub fn new(repo: StateRepo, clock: Arc<dyn Clock>) -> Self {
        let state = repo.stats();
        let mut tracker = Self { state, repo, clock };
        tracker.rollover();
        tracker
    }

    pub fn state(&self) -> &StatsState {
        &self.state
    }

    /// A task was toggled complete.
    pub fn on_task_completed(&mut self) {
        self.state.tasks_today += 1;
        self.state.tasks_this_week += 1;
        let today = self.clock.today();
        *self.state.daily_history.entry(today).or_insert(0) += 1;
        self.unlock_achievements();
        self.persist();
    }

    /// A task was toggled back to incomplete. Floors at zero; the history
    /// entry stays as-is (see [`StatsState::daily_history`]).
    pub fn on_task_uncompleted(&mut self) {
        self.state.tasks_today = self.state.tasks_today.saturating_sub(1);
        self.state.tasks_this_week = self.state.tasks_this_week.saturating_sub(1);
        self.persist();
    }

    /// A focus session ran to completion.
    pub fn on_focus_session_completed(&mut self) {
        self.state.pomodoros_today += 1;
        self.persist();
    }

    fn rollover(&mut self) {
        let today = self.clock.today();
        let last_active = self.repo.last_active_date();

        if last_active.as_deref() != Some(today.as_str()) {
            self.state.tasks_today = 0;
            self.state.pomodoros_today = 0;
            let tasks = self.repo.tasks();
            self.recompute_week(&tasks);
            if let Err(e) = self.repo.save_last_active_date(&today) {
                warn!("failed to persist last active date: {e}");
            }
        }

        self.state.daily_history.entry(today).or_insert(0);
        // Simplified streak rule: today's completions keep it alive at >= 1.
        self.state.current_streak = if self.state.tasks_today > 0 {
            self.state.current_streak.max(1)
        } else {
            0
        };
        self.persist();
    }

    fn recompute_week(&mut self, tasks: &[TaskRecord]) {
        let now_ms = self.clock.now_ms();
        self.state.tasks_this_week = tasks
            .iter()
            .filter(|t| t.completed && t.created_within(now_ms, WEEK_MS))
            .count() as u32;
    }

    fn unlock_achievements(&mut self) {
        for (threshold, text) in ACHIEVEMENTS {
            if self.state.tasks_today == threshold
                && !self.state.achievements.iter().any(|a| a == text)
            {
                self.state.achievements.push(text.to_string());
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save_stats(&self.state) {
            warn!("failed to persist stats: {e}");
        }
    }
}
