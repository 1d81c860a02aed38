//! Cancellable repeating timers.
//!
//! All "concurrency" in this system is independently scheduled repeating
//! timers interleaving on the tokio event queue: one 1-second ticker for
//! the pomodoro engine and one per reminder. Each timer source is tracked
//! by a [`Ticker`] handle so it can be cancelled; replacing a handle
//! aborts the previous one first, which keeps the invariant of at most one
//! live timer per logical engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::events::Event;
use crate::reminder::ReminderScheduler;
use crate::stats::StatsTracker;
use crate::timer::{PomodoroEngine, SessionKind};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owned handle over a spawned repeating task. At most one live handle;
/// `replace` cancels the previous task before installing the new one, and
/// dropping the ticker aborts whatever is left.
#[derive(Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Install a new task handle, aborting any previous one first.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.handle = Some(handle);
    }

    /// Abort the task. Synchronous; safe to call when nothing is running.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drives a [`PomodoroEngine`] with a once-per-second tick and routes
/// focus completions to the [`StatsTracker`].
pub struct PomodoroRunner {
    engine: Arc<Mutex<PomodoroEngine>>,
    stats: Arc<Mutex<StatsTracker>>,
    ticker: Ticker,
}

impl PomodoroRunner {
    pub fn new(engine: Arc<Mutex<PomodoroEngine>>, stats: Arc<Mutex<StatsTracker>>) -> Self {
        Self {
            engine,
            stats,
            ticker: Ticker::new(),
        }
    }

    pub fn engine(&self) -> Arc<Mutex<PomodoroEngine>> {
        self.engine.clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Start (or resume) the countdown and attach the ticker. Calling
    /// start while already ticking spawns nothing; a rehydrated engine
    /// whose persisted state says "running" gets a fresh ticker.
    pub fn start(&mut self) -> Option<Event> {
        let event = lock(&self.engine).start();
        let needs_ticker = event.is_some()
            || (lock(&self.engine).is_running() && !self.ticker.is_active());
        if needs_ticker {
            self.spawn_ticker();
        }
        event
    }

    /// Cancel the ticker, then suspend the countdown.
    pub fn pause(&mut self) -> Option<Event> {
        self.ticker.cancel();
        lock(&self.engine).pause()
    }

    /// Cancel the ticker, then restore a fresh focus session.
    pub fn reset(&mut self) -> Option<Event> {
        self.ticker.cancel();
        lock(&self.engine).reset()
    }

    fn spawn_ticker(&mut self) {
        let engine = self.engine.clone();
        let stats = self.stats.clone();
        let period = Duration::from_secs(1);
        let first_tick = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(first_tick, period);
            loop {
                interval.tick().await;
                let event = lock(&engine).tick();
                match event {
                    Some(Event::SessionCompleted { finished, .. }) => {
                        if finished == SessionKind::Focus {
                            lock(&stats).on_focus_session_completed();
                        }
                        // The engine stopped at the session boundary; the
                        // next start attaches a fresh ticker.
                        break;
                    }
                    Some(_) => {}
                    None => {
                        if !lock(&engine).is_running() {
                            break;
                        }
                    }
                }
            }
        });
        self.ticker.replace(handle);
    }
}

/// Drives one [`ReminderScheduler`] with a repeating timer of period
/// `interval_min * 60 s`.
pub struct ReminderRunner {
    scheduler: Arc<ReminderScheduler>,
    ticker: Ticker,
    period_override: Option<Duration>,
}

impl ReminderRunner {
    pub fn new(scheduler: ReminderScheduler) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            ticker: Ticker::new(),
            period_override: None,
        }
    }

    /// Override the firing period (tests and simulations).
    pub fn with_period_override(mut self, period: Duration) -> Self {
        self.period_override = Some(period);
        self
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Persist the reminder config and attach the repeating timer.
    pub fn start(&mut self, interval_min: u32, rest_secs: Option<u32>) -> Event {
        let event = self.scheduler.start(interval_min, rest_secs);
        self.spawn_ticker(interval_min.max(1));
        event
    }

    /// Cancel the timer, then flag the reminder inactive.
    pub fn stop(&mut self) -> Event {
        self.ticker.cancel();
        self.scheduler.stop()
    }

    /// Restart-on-reload: a reminder persisted as active is re-started
    /// with its persisted interval, so the next fire happens one full
    /// interval from now.
    pub fn resume_if_active(&mut self) -> Option<Event> {
        if !self.scheduler.is_active() {
            return None;
        }
        let interval_min = self.scheduler.interval_min();
        Some(self.start(interval_min, None))
    }

    fn spawn_ticker(&mut self, interval_min: u32) {
        let scheduler = self.scheduler.clone();
        let period = self
            .period_override
            .unwrap_or_else(|| Duration::from_secs(u64::from(interval_min) * 60));
        let first_tick = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(first_tick, period);
            loop {
                interval.tick().await;
                scheduler.fire();
            }
        });
        self.ticker.replace(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::notify::Notifier;
    use crate::reminder::ReminderKind;
    use crate::store::{Database, StateRepo};
    use crate::timer::PomodoroState;

    struct SilentNotifier;

    impl Notifier for SilentNotifier {
        fn notify(&self, _title: &str, _message: &str) {}
    }

    fn fixtures(time_left_secs: u32) -> (PomodoroRunner, StateRepo) {
        let repo = StateRepo::new(Database::open_memory().unwrap());
        let mut state = PomodoroState::default();
        state.time_left_secs = time_left_secs;
        repo.save_pomodoro(&state).unwrap();

        let clock = ManualClock::at(0);
        let notifier = Arc::new(SilentNotifier);
        let engine = PomodoroEngine::new(repo.clone(), notifier, clock.clone());
        let stats = StatsTracker::new(repo.clone(), clock);
        let runner = PomodoroRunner::new(
            Arc::new(Mutex::new(engine)),
            Arc::new(Mutex::new(stats)),
        );
        (runner, repo)
    }

    async fn advance_secs(secs: u64) {
        for _ in 0..secs {
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_decrements_once_per_second() {
        let (mut runner, _) = fixtures(100);
        runner.start();
        advance_secs(10).await;
        let engine = runner.engine();
        assert_eq!(lock(&engine).state().time_left_secs, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_keeps_a_single_ticker() {
        let (mut runner, _) = fixtures(100);
        runner.start();
        runner.start();
        advance_secs(10).await;
        let engine = runner.engine();
        // Two live tickers would have decremented twice per second.
        assert_eq!(lock(&engine).state().time_left_secs, 90);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_cancels_the_ticker_synchronously() {
        let (mut runner, _) = fixtures(100);
        runner.start();
        advance_secs(3).await;
        runner.pause();
        assert!(!runner.is_ticking());
        advance_secs(10).await;
        let engine = runner.engine();
        assert_eq!(lock(&engine).state().time_left_secs, 97);
    }

    #[tokio::test(start_paused = true)]
    async fn session_completion_stops_ticker_and_counts_pomodoro() {
        let (mut runner, repo) = fixtures(3);
        runner.start();
        advance_secs(4).await;
        let engine = runner.engine();
        let state = lock(&engine).state().clone();
        assert_eq!(state.current_session, SessionKind::Break);
        assert!(!state.is_running);
        assert!(!runner.is_ticking());
        assert_eq!(repo.stats().pomodoros_today, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reminder_runner_fires_each_period() {
        let repo = StateRepo::new(Database::open_memory().unwrap());
        let scheduler = ReminderScheduler::new(
            ReminderKind::EyeRest,
            repo.clone(),
            Arc::new(SilentNotifier),
            ManualClock::at(0),
        );
        let mut runner =
            ReminderRunner::new(scheduler).with_period_override(Duration::from_secs(1));
        runner.start(20, Some(20));
        advance_secs(3).await;
        assert_eq!(repo.eye_break_count(), 3);

        runner.stop();
        assert!(!runner.is_ticking());
        advance_secs(3).await;
        assert_eq!(repo.eye_break_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_if_active_restarts_with_persisted_interval() {
        let repo = StateRepo::new(Database::open_memory().unwrap());
        let clock = ManualClock::at(60 * 60_000);
        // Persisted: active, 30 min interval, last fired 45 minutes ago.
        repo.set_reminder_active(ReminderKind::Hydration, true).unwrap();
        repo.set_reminder_interval_min(ReminderKind::Hydration, 30).unwrap();
        repo.set_reminder_last_fired_ms(ReminderKind::Hydration, 15 * 60_000)
            .unwrap();

        let scheduler = ReminderScheduler::new(
            ReminderKind::Hydration,
            repo.clone(),
            Arc::new(SilentNotifier),
            clock.clone(),
        );
        let mut runner = ReminderRunner::new(scheduler);
        assert!(runner.resume_if_active().is_some());
        assert!(runner.is_ticking());

        // The overdue fire is *not* delivered immediately; the next one is
        // a full interval from the restart moment.
        let status = runner.scheduler().status_snapshot(clock.now_ms());
        assert_eq!(status.minutes_since_last_fire, 0);
        assert_eq!(status.minutes_until_next, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_does_nothing_when_inactive() {
        let repo = StateRepo::new(Database::open_memory().unwrap());
        let scheduler = ReminderScheduler::new(
            ReminderKind::Hydration,
            repo,
            Arc::new(SilentNotifier),
            ManualClock::at(0),
        );
        let mut runner = ReminderRunner::new(scheduler);
        assert!(runner.resume_if_active().is_none());
        assert!(!runner.is_ticking());
    }
}
