//! Live mode: the long-running process that actually drives the tickers.
//!
//! Rehydrates the engine, resumes any reminder that was active on the
//! previous run, then sits on the tokio runtime until Ctrl-C. All tickers
//! are cancelled on drop when the loop exits.

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use focusdesk_core::{
    PomodoroEngine, PomodoroRunner, ReminderKind, ReminderRunner, ReminderScheduler, StatsTracker,
};
use log::info;

use super::context;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

pub async fn run(start_timer: bool) -> Result<(), Box<dyn Error>> {
    let ctx = context()?;

    let engine = Arc::new(Mutex::new(PomodoroEngine::with_defaults(
        ctx.repo.clone(),
        ctx.notifier.clone(),
        ctx.clock.clone(),
        ctx.config.timer.initial_state(),
    )));
    let stats = Arc::new(Mutex::new(StatsTracker::new(
        ctx.repo.clone(),
        ctx.clock.clone(),
    )));
    let mut pomodoro = PomodoroRunner::new(engine.clone(), stats);

    let mut water = ReminderRunner::new(ReminderScheduler::new(
        ReminderKind::Hydration,
        ctx.repo.clone(),
        ctx.notifier.clone(),
        ctx.clock.clone(),
    ));
    let mut eye = ReminderRunner::new(ReminderScheduler::new(
        ReminderKind::EyeRest,
        ctx.repo.clone(),
        ctx.notifier.clone(),
        ctx.clock.clone(),
    ));

    // Reminders restart with a full interval regardless of elapsed time.
    if water.resume_if_active().is_some() {
        info!(
            "hydration reminder resumed ({} min)",
            water.scheduler().interval_min()
        );
    }
    if eye.resume_if_active().is_some() {
        info!(
            "eye rest reminder resumed ({} min)",
            eye.scheduler().interval_min()
        );
    }

    let persisted_running = lock(&engine).is_running();
    if start_timer || persisted_running {
        pomodoro.start();
        info!("pomodoro countdown ticking");
    }

    let mut status = tokio::time::interval(Duration::from_secs(60));
    status.tick().await; // the first tick completes immediately

    loop {
        tokio::select! {
            _ = status.tick() => {
                let snapshot = lock(&engine).snapshot();
                info!("{}", serde_json::to_string(&snapshot)?);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("shutting down");
    Ok(())
}
