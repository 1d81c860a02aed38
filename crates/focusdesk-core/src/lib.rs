//! # Focusdesk Core Library
//!
//! This library provides the core business logic for Focusdesk: a Pomodoro
//! session state machine, recurring health reminders (hydration and eye
//! rest), a notification gateway and simple usage statistics, all persisted
//! through a single key-value store. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary, with any
//! display layer being a thin view over the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a state machine over focus/break/long-break sessions.
//!   The caller (normally a [`runtime::PomodoroRunner`] ticker) invokes
//!   `tick()` once a second for progress.
//! - **Reminders**: two independent recurring schedules that fire fixed
//!   notifications and derive "time since last fire" status.
//! - **Storage**: a SQLite key-value table plus a typed repository that owns
//!   all (de)serialization and range clamping; malformed stored values
//!   degrade to defaults, never to errors.
//! - **Runtime**: cancellable tokio interval tickers, at most one per
//!   logical timer.
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: session state machine
//! - [`ReminderScheduler`]: hydration / eye-rest schedules
//! - [`NotificationGateway`]: system notification with in-process fallback
//! - [`StatsTracker`]: daily counters, achievements, rollover
//! - [`StateRepo`]: typed persistence over the kv [`Database`]

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod reminder;
pub mod runtime;
pub mod stats;
pub mod store;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use notify::{FallbackAlert, NotificationGateway, Notifier, Permission};
pub use reminder::{ReminderKind, ReminderScheduler, ReminderStatus};
pub use runtime::{PomodoroRunner, ReminderRunner, Ticker};
pub use stats::{StatsState, StatsTracker};
pub use store::{Config, Database, RemindersConfig, StateRepo, TimerConfig};
pub use task::{TaskPriority, TaskRecord};
pub use timer::{PomodoroEngine, PomodoroState, SessionKind, TimerSettings};
