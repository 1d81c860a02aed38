//! Persisted pomodoro state.
//!
//! The blob keeps the original camelCase field names (`isRunning`,
//! `timeLeft`, `settings.longBreak`, ...) so state written by earlier
//! versions of the widget rehydrates cleanly. Out-of-range or missing
//! values are coerced into range by [`PomodoroState::clamped`], never
//! rejected.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    Focus,
    Break,
    LongBreak,
}

impl SessionKind {
    pub fn display_name(self) -> &'static str {
        match self {
            SessionKind::Focus => "Focus Session",
            SessionKind::Break => "Short Break",
            SessionKind::LongBreak => "Long Break",
        }
    }
}

/// Session durations in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    #[serde(rename = "focus")]
    pub focus_min: u32,
    #[serde(rename = "break")]
    pub break_min: u32,
    #[serde(rename = "longBreak")]
    pub long_break_min: u32,
}

pub const FOCUS_MIN_RANGE: (u32, u32) = (1, 60);
pub const BREAK_MIN_RANGE: (u32, u32) = (1, 30);
pub const LONG_BREAK_MIN_RANGE: (u32, u32) = (1, 60);
pub const TOTAL_CYCLES_RANGE: (u32, u32) = (1, 10);

fn clamp(value: u32, (lo, hi): (u32, u32)) -> u32 {
    value.clamp(lo, hi)
}

impl TimerSettings {
    pub fn clamped(self) -> Self {
        Self {
            focus_min: clamp(self.focus_min, FOCUS_MIN_RANGE),
            break_min: clamp(self.break_min, BREAK_MIN_RANGE),
            long_break_min: clamp(self.long_break_min, LONG_BREAK_MIN_RANGE),
        }
    }

    pub fn duration_secs(self, session: SessionKind) -> u32 {
        let minutes = match session {
            SessionKind::Focus => self.focus_min,
            SessionKind::Break => self.break_min,
            SessionKind::LongBreak => self.long_break_min,
        };
        minutes.saturating_mul(60)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_min: 25,
            break_min: 5,
            long_break_min: 15,
        }
    }
}

/// The full persisted pomodoro state. Singleton, overwritten in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroState {
    pub is_running: bool,
    pub is_paused: bool,
    pub current_session: SessionKind,
    #[serde(rename = "timeLeft")]
    pub time_left_secs: u32,
    pub cycle: u32,
    pub total_cycles: u32,
    pub settings: TimerSettings,
}

impl Default for PomodoroState {
    fn default() -> Self {
        let settings = TimerSettings::default();
        Self {
            is_running: false,
            is_paused: false,
            current_session: SessionKind::Focus,
            time_left_secs: settings.duration_secs(SessionKind::Focus),
            cycle: 1,
            total_cycles: 4,
            settings,
        }
    }
}

impl PomodoroState {
    /// Coerce every field into its documented range and repair the
    /// running/paused invariant (never both true). A rehydrated state has
    /// no live ticker, so paused wins.
    pub fn clamped(mut self) -> Self {
        self.settings = self.settings.clamped();
        self.total_cycles = clamp(self.total_cycles, TOTAL_CYCLES_RANGE);
        self.cycle = self.cycle.clamp(1, self.total_cycles);
        if self.is_running && self.is_paused {
            self.is_running = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_state_is_idle_focus() {
        let state = PomodoroState::default();
        assert!(!state.is_running);
        assert!(!state.is_paused);
        assert_eq!(state.current_session, SessionKind::Focus);
        assert_eq!(state.time_left_secs, 1500);
        assert_eq!(state.cycle, 1);
        assert_eq!(state.total_cycles, 4);
    }

    #[test]
    fn blob_uses_original_field_names() {
        let json = serde_json::to_value(PomodoroState::default()).unwrap();
        assert!(json.get("isRunning").is_some());
        assert!(json.get("timeLeft").is_some());
        assert_eq!(json["currentSession"], "focus");
        assert_eq!(json["settings"]["longBreak"], 15);
    }

    #[test]
    fn long_break_session_serializes_camel_case() {
        let json = serde_json::to_string(&SessionKind::LongBreak).unwrap();
        assert_eq!(json, "\"longBreak\"");
    }

    #[test]
    fn partial_blob_merges_over_defaults() {
        let state: PomodoroState = serde_json::from_str(r#"{"timeLeft": 42}"#).unwrap();
        assert_eq!(state.time_left_secs, 42);
        assert_eq!(state.settings.focus_min, 25);
    }

    #[test]
    fn clamp_pulls_extremes_into_range() {
        let state = PomodoroState {
            total_cycles: 0,
            cycle: 99,
            settings: TimerSettings {
                focus_min: 999,
                break_min: 0,
                long_break_min: 61,
            },
            ..PomodoroState::default()
        }
        .clamped();
        assert_eq!(state.settings.focus_min, 60);
        assert_eq!(state.settings.break_min, 1);
        assert_eq!(state.settings.long_break_min, 60);
        assert_eq!(state.total_cycles, 1);
        assert_eq!(state.cycle, 1);
    }

    #[test]
    fn clamp_repairs_running_and_paused() {
        let state = PomodoroState {
            is_running: true,
            is_paused: true,
            ..PomodoroState::default()
        }
        .clamped();
        assert!(!state.is_running);
        assert!(state.is_paused);
    }

    proptest! {
        #[test]
        fn clamped_settings_always_in_range(focus in 0u32..10_000, brk in 0u32..10_000, long in 0u32..10_000) {
            let s = TimerSettings { focus_min: focus, break_min: brk, long_break_min: long }.clamped();
            prop_assert!((1..=60).contains(&s.focus_min));
            prop_assert!((1..=30).contains(&s.break_min));
            prop_assert!((1..=60).contains(&s.long_break_min));
        }

        #[test]
        fn clamped_cycle_never_exceeds_total(cycle in 0u32..100, total in 0u32..100) {
            let s = PomodoroState { cycle, total_cycles: total, ..PomodoroState::default() }.clamped();
            prop_assert!((1..=10).contains(&s.total_cycles));
            prop_assert!(s.cycle >= 1 && s.cycle <= s.total_cycles);
        }
    }
}
