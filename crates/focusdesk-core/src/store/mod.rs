mod config;
mod database;
mod repo;

pub use config::{Config, NotificationsConfig, RemindersConfig, TimerConfig};
pub use database::Database;
pub use repo::{keys, StateRepo};

use std::path::PathBuf;

/// Returns `~/.config/focusdesk[-dev]/` based on FOCUSDESK_ENV.
///
/// Set FOCUSDESK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSDESK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusdesk-dev")
    } else {
        base_dir.join("focusdesk")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
