//! Recurring health reminders.
//!
//! Two independent schedules: hydration and eye rest. Each persists an
//! active flag, its interval configuration and the last-fired timestamp,
//! and fires a fixed notification template each period. The scheduler
//! itself is timer-free -- a [`crate::runtime::ReminderRunner`] owns the
//! actual interval and calls [`ReminderScheduler::fire`].
//!
//! Restart policy: a reminder that was active when the process died is
//! resumed with its *persisted* interval, so the next fire happens one
//! full interval after restart. Elapsed-time-aware rescheduling is a
//! deliberate non-feature.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::events::Event;
use crate::notify::Notifier;
use crate::store::StateRepo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Hydration,
    EyeRest,
}

impl ReminderKind {
    pub fn default_interval_min(self) -> u32 {
        match self {
            ReminderKind::Hydration => 60,
            ReminderKind::EyeRest => 20,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReminderKind::Hydration => "Water Reminder 💧",
            ReminderKind::EyeRest => "Eye Rest Reminder 👁️",
        }
    }
}

/// Pure status derivation used by both the detail view and the compact
/// dashboard widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderStatus {
    pub active: bool,
    pub interval_min: u32,
    pub minutes_since_last_fire: u32,
    pub minutes_until_next: u32,
}

pub struct ReminderScheduler {
    kind: ReminderKind,
    repo: StateRepo,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl ReminderScheduler {
    pub fn new(
        kind: ReminderKind,
        repo: StateRepo,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kind,
            repo,
            notifier,
            clock,
        }
    }

    pub fn kind(&self) -> ReminderKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.repo.reminder_active(self.kind)
    }

    pub fn interval_min(&self) -> u32 {
        self.repo.reminder_interval_min(self.kind)
    }

    /// Flag active, persist the interval config and stamp last-fired to
    /// now. Eye rest additionally records its rest duration (floor 5 s).
    pub fn start(&self, interval_min: u32, rest_secs: Option<u32>) -> Event {
        let interval_min = interval_min.max(1);
        self.persist(self.repo.set_reminder_active(self.kind, true));
        self.persist(self.repo.set_reminder_interval_min(self.kind, interval_min));
        if self.kind == ReminderKind::EyeRest {
            if let Some(rest) = rest_secs {
                self.persist(self.repo.set_eye_rest_secs(rest));
            }
        }
        self.persist(
            self.repo
                .set_reminder_last_fired_ms(self.kind, self.clock.now_ms()),
        );
        Event::ReminderStarted {
            kind: self.kind,
            interval_min,
            at: self.clock.now(),
        }
    }

    /// Flag inactive. Idempotent.
    pub fn stop(&self) -> Event {
        self.persist(self.repo.set_reminder_active(self.kind, false));
        Event::ReminderStopped {
            kind: self.kind,
            at: self.clock.now(),
        }
    }

    /// Persist a new interval without touching an in-flight timer; the
    /// change takes effect when start is next invoked.
    pub fn set_interval_min(&self, interval_min: u32) {
        self.persist(self.repo.set_reminder_interval_min(self.kind, interval_min));
    }

    /// One scheduled firing: notify, restamp last-fired, bump the eye-rest
    /// fire counter.
    pub fn fire(&self) -> Event {
        self.notifier.notify(self.kind.title(), &self.message());
        self.persist(
            self.repo
                .set_reminder_last_fired_ms(self.kind, self.clock.now_ms()),
        );
        if self.kind == ReminderKind::EyeRest {
            let count = self.repo.eye_break_count();
            self.persist(self.repo.set_eye_break_count(count + 1));
        }
        Event::ReminderFired {
            kind: self.kind,
            at: self.clock.now(),
        }
    }

    /// Pure function of persisted state; safe to call from any view at
    /// any cadence.
    pub fn status_snapshot(&self, now_ms: u64) -> ReminderStatus {
        let interval_min = self.interval_min();
        let last = self.repo.reminder_last_fired_ms(self.kind).unwrap_or(now_ms);
        let minutes_since = (now_ms.saturating_sub(last) / 60_000) as u32;
        ReminderStatus {
            active: self.is_active(),
            interval_min,
            minutes_since_last_fire: minutes_since,
            minutes_until_next: interval_min.saturating_sub(minutes_since),
        }
    }

    fn message(&self) -> String {
        match self.kind {
            ReminderKind::Hydration => {
                "Time to drink some water! Stay hydrated for better focus.".to_string()
            }
            ReminderKind::EyeRest => format!(
                "Time for a short eye break! Rest your eyes for {} seconds.",
                self.repo.eye_rest_secs()
            ),
        }
    }

    fn persist(&self, result: Result<(), crate::error::StoreError>) {
        if let Err(e) = result {
            warn!("failed to persist {:?} reminder state: {e}", self.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::Database;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, message: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
        }
    }

    fn scheduler(kind: ReminderKind, clock: Arc<ManualClock>) -> (ReminderScheduler, Arc<RecordingNotifier>, StateRepo) {
        let repo = StateRepo::new(Database::open_memory().unwrap());
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(Vec::new()),
        });
        let sched = ReminderScheduler::new(kind, repo.clone(), notifier.clone(), clock);
        (sched, notifier, repo)
    }

    #[test]
    fn start_persists_config_and_stamps_now() {
        let clock = ManualClock::at(1_000_000);
        let (sched, _, repo) = scheduler(ReminderKind::Hydration, clock);
        sched.start(30, None);
        assert!(sched.is_active());
        assert_eq!(repo.reminder_interval_min(ReminderKind::Hydration), 30);
        assert_eq!(
            repo.reminder_last_fired_ms(ReminderKind::Hydration),
            Some(1_000_000)
        );
    }

    #[test]
    fn stop_is_idempotent() {
        let (sched, _, _) = scheduler(ReminderKind::Hydration, ManualClock::at(0));
        sched.start(30, None);
        sched.stop();
        sched.stop();
        assert!(!sched.is_active());
    }

    #[test]
    fn fire_notifies_and_restamps() {
        let clock = ManualClock::at(0);
        let (sched, notifier, repo) = scheduler(ReminderKind::Hydration, clock.clone());
        sched.start(30, None);
        clock.set(45 * 60_000);
        sched.fire();
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "Water Reminder 💧");
        assert_eq!(
            repo.reminder_last_fired_ms(ReminderKind::Hydration),
            Some(45 * 60_000)
        );
    }

    #[test]
    fn eye_rest_fire_embeds_rest_secs_and_counts() {
        let (sched, notifier, repo) = scheduler(ReminderKind::EyeRest, ManualClock::at(0));
        sched.start(20, Some(30));
        sched.fire();
        sched.fire();
        let sent = notifier.sent.lock().unwrap();
        assert!(sent[0].1.contains("30 seconds"));
        assert_eq!(repo.eye_break_count(), 2);
    }

    #[test]
    fn hydration_does_not_touch_eye_counter() {
        let (sched, _, repo) = scheduler(ReminderKind::Hydration, ManualClock::at(0));
        sched.start(60, None);
        sched.fire();
        assert_eq!(repo.eye_break_count(), 0);
    }

    #[test]
    fn snapshot_derives_since_and_next() {
        let clock = ManualClock::at(0);
        let (sched, _, _) = scheduler(ReminderKind::Hydration, clock.clone());
        sched.start(30, None);
        clock.advance_ms(12 * 60_000);
        let status = sched.status_snapshot(clock.now_ms());
        assert!(status.active);
        assert_eq!(status.minutes_since_last_fire, 12);
        assert_eq!(status.minutes_until_next, 18);
    }

    #[test]
    fn snapshot_next_floors_at_zero() {
        let clock = ManualClock::at(0);
        let (sched, _, _) = scheduler(ReminderKind::Hydration, clock.clone());
        sched.start(30, None);
        clock.advance_ms(45 * 60_000);
        let status = sched.status_snapshot(clock.now_ms());
        assert_eq!(status.minutes_until_next, 0);
    }

    #[test]
    fn snapshot_is_side_effect_free() {
        let clock = ManualClock::at(0);
        let (sched, notifier, repo) = scheduler(ReminderKind::EyeRest, clock.clone());
        sched.start(20, None);
        clock.advance_ms(5 * 60_000);
        let before = repo.reminder_last_fired_ms(ReminderKind::EyeRest);
        let a = sched.status_snapshot(clock.now_ms());
        let b = sched.status_snapshot(clock.now_ms());
        assert_eq!(a, b);
        assert_eq!(repo.reminder_last_fired_ms(ReminderKind::EyeRest), before);
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn reconfigure_while_active_persists_only() {
        let (sched, _, repo) = scheduler(ReminderKind::Hydration, ManualClock::at(0));
        sched.start(30, None);
        sched.set_interval_min(45);
        // Persisted for the next start; the active flag and last-fired
        // stamp are untouched.
        assert_eq!(repo.reminder_interval_min(ReminderKind::Hydration), 45);
        assert!(sched.is_active());
    }
}
