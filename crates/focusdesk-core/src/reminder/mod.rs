mod scheduler;

pub use scheduler::{ReminderKind, ReminderScheduler, ReminderStatus};
