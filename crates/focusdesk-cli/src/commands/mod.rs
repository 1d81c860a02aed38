//! CLI command implementations.

pub mod config;
pub mod reminder;
pub mod run;
pub mod stats;
pub mod task;
pub mod timer;

use std::error::Error;
use std::sync::Arc;

use focusdesk_core::{Clock, Config, Database, NotificationGateway, StateRepo, SystemClock};

/// Shared wiring for every subcommand: the store, the loaded config and
/// a notification gateway honoring `notifications.enabled`.
pub struct AppContext {
    pub repo: StateRepo,
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<NotificationGateway>,
}

pub fn context() -> Result<AppContext, Box<dyn Error>> {
    let config = Config::load_or_default();
    let repo = StateRepo::new(Database::open()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = Arc::new(NotificationGateway::new(
        config.notifications.enabled,
        clock.clone(),
    ));
    Ok(AppContext {
        repo,
        config,
        clock,
        notifier,
    })
}

/// Print an event (or any serializable payload) as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
