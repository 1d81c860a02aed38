//! Typed repository over the kv store.
//!
//! One accessor per logical field. Reads never fail outward: a malformed
//! JSON blob or a non-numeric scalar is logged as a recoverable warning and
//! replaced by the default, and numeric settings are clamped into their
//! documented ranges on the way in. Writes return the underlying store
//! error so explicit operations can surface it.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::reminder::ReminderKind;
use crate::stats::StatsState;
use crate::task::TaskRecord;
use crate::timer::PomodoroState;

use super::Database;

/// The persisted key space. One scalar or JSON blob per key.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const THEME: &str = "theme";
    pub const POMODORO: &str = "pomodoro";
    pub const STATS: &str = "stats";
    pub const LAST_ACTIVE_DATE: &str = "last_active_date";
    pub const WATER_ACTIVE: &str = "water_active";
    pub const WATER_INTERVAL_MIN: &str = "water_interval_min";
    pub const WATER_LAST_FIRED_MS: &str = "water_last_fired_ms";
    pub const WATER_COUNT: &str = "water_count";
    pub const EYE_ACTIVE: &str = "eye_active";
    pub const EYE_INTERVAL_MIN: &str = "eye_interval_min";
    pub const EYE_REST_SECS: &str = "eye_rest_secs";
    pub const EYE_LAST_FIRED_MS: &str = "eye_last_fired_ms";
    pub const EYE_BREAK_COUNT: &str = "eye_break_count";
}

pub const MIN_EYE_REST_SECS: u32 = 5;
pub const DEFAULT_EYE_REST_SECS: u32 = 20;

#[derive(Clone)]
pub struct StateRepo {
    db: Database,
}

impl StateRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ── Generic helpers ──────────────────────────────────────────────

    fn raw(&self, key: &str) -> Option<String> {
        match self.db.kv_get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!("read of '{key}' failed, using default: {e}");
                None
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("stored '{key}' is corrupt, using default: {e}");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StoreError::QueryFailed(format!("serialize '{key}': {e}")))?;
        self.db.kv_set(key, &raw)
    }

    fn get_u64(&self, key: &str) -> Option<u64> {
        let raw = self.raw(key)?;
        match raw.trim().parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("stored '{key}' is not a number ({raw:?}), using default");
                None
            }
        }
    }

    fn get_bool(&self, key: &str) -> bool {
        self.raw(key).as_deref() == Some("true")
    }

    // ── Pomodoro ─────────────────────────────────────────────────────

    /// Rehydrate the pomodoro state, clamping out-of-range values.
    pub fn pomodoro(&self) -> PomodoroState {
        self.pomodoro_or(PomodoroState::default())
    }

    /// Like [`StateRepo::pomodoro`], but an empty store yields `default`
    /// (typically seeded from the `[timer]` config section) instead of the
    /// built-in 25/5/15.
    pub fn pomodoro_or(&self, default: PomodoroState) -> PomodoroState {
        self.get_json::<PomodoroState>(keys::POMODORO)
            .unwrap_or(default)
            .clamped()
    }

    pub fn save_pomodoro(&self, state: &PomodoroState) -> Result<(), StoreError> {
        self.set_json(keys::POMODORO, state)
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn stats(&self) -> StatsState {
        self.get_json(keys::STATS).unwrap_or_default()
    }

    pub fn save_stats(&self, stats: &StatsState) -> Result<(), StoreError> {
        self.set_json(keys::STATS, stats)
    }

    pub fn last_active_date(&self) -> Option<String> {
        self.raw(keys::LAST_ACTIVE_DATE)
    }

    pub fn save_last_active_date(&self, date: &str) -> Result<(), StoreError> {
        self.db.kv_set(keys::LAST_ACTIVE_DATE, date)
    }

    // ── Tasks / theme (collaborator surface) ─────────────────────────

    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.get_json(keys::TASKS).unwrap_or_default()
    }

    pub fn save_tasks(&self, tasks: &[TaskRecord]) -> Result<(), StoreError> {
        self.set_json(keys::TASKS, &tasks)
    }

    pub fn theme(&self) -> String {
        self.raw(keys::THEME).unwrap_or_else(|| "light".to_string())
    }

    pub fn save_theme(&self, theme: &str) -> Result<(), StoreError> {
        self.db.kv_set(keys::THEME, theme)
    }

    // ── Reminders ────────────────────────────────────────────────────

    fn active_key(kind: ReminderKind) -> &'static str {
        match kind {
            ReminderKind::Hydration => keys::WATER_ACTIVE,
            ReminderKind::EyeRest => keys::EYE_ACTIVE,
        }
    }

    fn interval_key(kind: ReminderKind) -> &'static str {
        match kind {
            ReminderKind::Hydration => keys::WATER_INTERVAL_MIN,
            ReminderKind::EyeRest => keys::EYE_INTERVAL_MIN,
        }
    }

    fn last_fired_key(kind: ReminderKind) -> &'static str {
        match kind {
            ReminderKind::Hydration => keys::WATER_LAST_FIRED_MS,
            ReminderKind::EyeRest => keys::EYE_LAST_FIRED_MS,
        }
    }

    pub fn reminder_active(&self, kind: ReminderKind) -> bool {
        self.get_bool(Self::active_key(kind))
    }

    pub fn set_reminder_active(&self, kind: ReminderKind, active: bool) -> Result<(), StoreError> {
        self.db
            .kv_set(Self::active_key(kind), if active { "true" } else { "false" })
    }

    /// Configured interval in minutes, floor 1, kind-specific default.
    pub fn reminder_interval_min(&self, kind: ReminderKind) -> u32 {
        self.get_u64(Self::interval_key(kind))
            .map(|v| (v as u32).max(1))
            .unwrap_or(kind.default_interval_min())
    }

    pub fn set_reminder_interval_min(
        &self,
        kind: ReminderKind,
        interval_min: u32,
    ) -> Result<(), StoreError> {
        self.db
            .kv_set(Self::interval_key(kind), &interval_min.max(1).to_string())
    }

    pub fn reminder_last_fired_ms(&self, kind: ReminderKind) -> Option<u64> {
        self.get_u64(Self::last_fired_key(kind))
    }

    pub fn set_reminder_last_fired_ms(
        &self,
        kind: ReminderKind,
        at_ms: u64,
    ) -> Result<(), StoreError> {
        self.db.kv_set(Self::last_fired_key(kind), &at_ms.to_string())
    }

    /// Eye-rest duration in seconds, floor 5.
    pub fn eye_rest_secs(&self) -> u32 {
        self.get_u64(keys::EYE_REST_SECS)
            .map(|v| (v as u32).max(MIN_EYE_REST_SECS))
            .unwrap_or(DEFAULT_EYE_REST_SECS)
    }

    pub fn set_eye_rest_secs(&self, secs: u32) -> Result<(), StoreError> {
        self.db.kv_set(
            keys::EYE_REST_SECS,
            &secs.max(MIN_EYE_REST_SECS).to_string(),
        )
    }

    // ── Counters ─────────────────────────────────────────────────────

    pub fn water_count(&self) -> u32 {
        self.get_u64(keys::WATER_COUNT).unwrap_or(0) as u32
    }

    pub fn set_water_count(&self, count: u32) -> Result<(), StoreError> {
        self.db.kv_set(keys::WATER_COUNT, &count.to_string())
    }

    pub fn eye_break_count(&self) -> u32 {
        self.get_u64(keys::EYE_BREAK_COUNT).unwrap_or(0) as u32
    }

    pub fn set_eye_break_count(&self, count: u32) -> Result<(), StoreError> {
        self.db.kv_set(keys::EYE_BREAK_COUNT, &count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> StateRepo {
        StateRepo::new(Database::open_memory().unwrap())
    }

    #[test]
    fn missing_keys_yield_defaults() {
        let repo = repo();
        let state = repo.pomodoro();
        assert_eq!(state.time_left_secs, 25 * 60);
        assert!(repo.tasks().is_empty());
        assert_eq!(repo.theme(), "light");
        assert!(!repo.reminder_active(ReminderKind::Hydration));
        assert_eq!(repo.reminder_interval_min(ReminderKind::Hydration), 60);
        assert_eq!(repo.reminder_interval_min(ReminderKind::EyeRest), 20);
        assert_eq!(repo.eye_rest_secs(), 20);
    }

    #[test]
    fn corrupt_pomodoro_blob_falls_back() {
        let repo = repo();
        repo.db.kv_set(keys::POMODORO, "{not json!").unwrap();
        let state = repo.pomodoro();
        assert_eq!(state.settings.focus_min, 25);
        assert_eq!(state.cycle, 1);
    }

    #[test]
    fn out_of_range_settings_clamp_on_load() {
        let repo = repo();
        repo.db
            .kv_set(
                keys::POMODORO,
                r#"{"isRunning":false,"isPaused":false,"currentSession":"focus",
                    "timeLeft":100,"cycle":1,"totalCycles":0,
                    "settings":{"focus":999,"break":5,"longBreak":15}}"#,
            )
            .unwrap();
        let state = repo.pomodoro();
        assert_eq!(state.settings.focus_min, 60);
        assert_eq!(state.total_cycles, 1);
    }

    #[test]
    fn non_numeric_interval_falls_back() {
        let repo = repo();
        repo.db.kv_set(keys::WATER_INTERVAL_MIN, "soon").unwrap();
        assert_eq!(repo.reminder_interval_min(ReminderKind::Hydration), 60);
    }

    #[test]
    fn eye_rest_floor_is_five_seconds() {
        let repo = repo();
        repo.set_eye_rest_secs(1).unwrap();
        assert_eq!(repo.eye_rest_secs(), 5);
    }

    #[test]
    fn reminder_flags_roundtrip() {
        let repo = repo();
        repo.set_reminder_active(ReminderKind::EyeRest, true).unwrap();
        repo.set_reminder_interval_min(ReminderKind::EyeRest, 40).unwrap();
        repo.set_reminder_last_fired_ms(ReminderKind::EyeRest, 12345).unwrap();
        assert!(repo.reminder_active(ReminderKind::EyeRest));
        assert_eq!(repo.reminder_interval_min(ReminderKind::EyeRest), 40);
        assert_eq!(repo.reminder_last_fired_ms(ReminderKind::EyeRest), Some(12345));
    }
}
