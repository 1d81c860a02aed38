//! Pomodoro engine implementation.
//!
//! The engine is a plain state machine. It does not own a thread or a
//! timer -- the caller (normally [`crate::runtime::PomodoroRunner`])
//! invokes `tick()` once a second while the timer runs.
//!
//! Every mutation persists the full state through the injected repo, so
//! the countdown survives a process restart. Session boundaries notify
//! through the injected [`Notifier`].

use std::sync::Arc;

use log::warn;

use crate::clock::Clock;
use crate::events::Event;
use crate::notify::Notifier;
use crate::store::StateRepo;

use super::state::{PomodoroState, SessionKind, TimerSettings, TOTAL_CYCLES_RANGE};

pub struct PomodoroEngine {
    state: PomodoroState,
    repo: StateRepo,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl PomodoroEngine {
    /// Rehydrate an engine from the store (clamping out-of-range values),
    /// or start from the built-in defaults when nothing is persisted.
    pub fn new(repo: StateRepo, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self::with_defaults(repo, notifier, clock, PomodoroState::default())
    }

    /// Like [`PomodoroEngine::new`], but an empty store starts from
    /// `defaults` (the CLI seeds this from the `[timer]` config section).
    /// Persisted state always wins over the seed.
    pub fn with_defaults(
        repo: StateRepo,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        defaults: PomodoroState,
    ) -> Self {
        let state = repo.pomodoro_or(defaults);
        Self {
            state,
            repo,
            notifier,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &PomodoroState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Build a full state snapshot event for the display layer.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            is_running: self.state.is_running,
            is_paused: self.state.is_paused,
            session: self.state.current_session,
            time_left_secs: self.state.time_left_secs,
            cycle: self.state.cycle,
            total_cycles: self.state.total_cycles,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) the countdown. Idempotent while already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_paused = false;
        self.state.is_running = true;
        self.persist();
        Some(Event::TimerStarted {
            session: self.state.current_session,
            time_left_secs: self.state.time_left_secs,
            cycle: self.state.cycle,
            at: self.clock.now(),
        })
    }

    /// Suspend the countdown. No-op if not running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_paused = true;
        self.state.is_running = false;
        self.persist();
        Some(Event::TimerPaused {
            time_left_secs: self.state.time_left_secs,
            at: self.clock.now(),
        })
    }

    /// Force a fresh focus session at cycle 1.
    pub fn reset(&mut self) -> Option<Event> {
        self.state.is_running = false;
        self.state.is_paused = false;
        self.state.current_session = SessionKind::Focus;
        self.state.time_left_secs = self.state.settings.duration_secs(SessionKind::Focus);
        self.state.cycle = 1;
        self.persist();
        Some(Event::TimerReset {
            at: self.clock.now(),
        })
    }

    /// Advance the countdown by one second. Returns the completion event
    /// when the running session reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.time_left_secs = self.state.time_left_secs.saturating_sub(1);
        if self.state.time_left_secs == 0 {
            return Some(self.complete_session());
        }
        self.persist();
        None
    }

    /// Apply new durations, clamped into range. When the engine is fully
    /// idle in a focus session the countdown resyncs to the new focus
    /// duration; a paused mid-session countdown is left alone.
    pub fn change_settings(
        &mut self,
        focus_min: u32,
        break_min: u32,
        long_break_min: u32,
        total_cycles: u32,
    ) -> Option<Event> {
        self.state.settings = TimerSettings {
            focus_min,
            break_min,
            long_break_min,
        }
        .clamped();
        self.state.total_cycles = total_cycles.clamp(TOTAL_CYCLES_RANGE.0, TOTAL_CYCLES_RANGE.1);
        self.state.cycle = self.state.cycle.clamp(1, self.state.total_cycles);

        if !self.state.is_running
            && !self.state.is_paused
            && self.state.current_session == SessionKind::Focus
        {
            self.state.time_left_secs = self.state.settings.duration_secs(SessionKind::Focus);
        }

        self.persist();
        Some(Event::SettingsChanged {
            settings: self.state.settings,
            total_cycles: self.state.total_cycles,
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Session reached zero: stop, pick the next session, notify.
    ///
    /// The cycle counter increments when a *short* break completes;
    /// returning from a long break leaves it at the 1 it was reset to
    /// when the long break began.
    fn complete_session(&mut self) -> Event {
        self.state.is_running = false;
        let finished = self.state.current_session;
        let settings = self.state.settings;

        match finished {
            SessionKind::Focus => {
                if self.state.cycle >= self.state.total_cycles {
                    self.state.current_session = SessionKind::LongBreak;
                    self.state.cycle = 1;
                    self.notifier.notify(
                        "Long Break Time!",
                        &format!(
                            "Great job! Take a {}-minute long break.",
                            settings.long_break_min
                        ),
                    );
                } else {
                    self.state.current_session = SessionKind::Break;
                    self.notifier.notify(
                        "Break Time!",
                        &format!(
                            "Focus session complete! Take a {}-minute break.",
                            settings.break_min
                        ),
                    );
                }
            }
            SessionKind::Break | SessionKind::LongBreak => {
                self.state.current_session = SessionKind::Focus;
                if finished == SessionKind::Break {
                    self.state.cycle += 1;
                }
                self.notifier.notify(
                    "Focus Time!",
                    &format!(
                        "Break is over! Time for a {}-minute focus session.",
                        settings.focus_min
                    ),
                );
            }
        }

        self.state.time_left_secs = settings.duration_secs(self.state.current_session);
        self.persist();

        Event::SessionCompleted {
            finished,
            next: self.state.current_session,
            cycle: self.state.cycle,
            at: self.clock.now(),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.repo.save_pomodoro(&self.state) {
            warn!("failed to persist pomodoro state: {e}");
        }
    }
}
