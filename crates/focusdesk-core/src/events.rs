use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reminder::ReminderKind;
use crate::timer::{SessionKind, TimerSettings};

/// Every state change in the system produces an Event.
/// The CLI prints them as JSON; the display layer polls for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session: SessionKind,
        time_left_secs: u32,
        cycle: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A session reached zero and the engine moved to the next one.
    SessionCompleted {
        finished: SessionKind,
        next: SessionKind,
        cycle: u32,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: TimerSettings,
        total_cycles: u32,
        at: DateTime<Utc>,
    },
    ReminderStarted {
        kind: ReminderKind,
        interval_min: u32,
        at: DateTime<Utc>,
    },
    ReminderStopped {
        kind: ReminderKind,
        at: DateTime<Utc>,
    },
    ReminderFired {
        kind: ReminderKind,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        is_running: bool,
        is_paused: bool,
        session: SessionKind,
        time_left_secs: u32,
        cycle: u32,
        total_cycles: u32,
        at: DateTime<Utc>,
    },
}
