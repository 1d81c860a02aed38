mod engine;
mod state;

pub use engine::PomodoroEngine;
pub use state::{PomodoroState, SessionKind, TimerSettings};
