//! Notification delivery.
//!
//! Both the pomodoro engine and the reminder schedulers emit through the
//! [`Notifier`] seam. The production implementation tries a system-level
//! notification first and degrades silently to an in-process alert that
//! auto-dismisses after five seconds. Delivery never fails outward.

use std::sync::{Arc, Mutex, PoisonError};

use log::warn;

use crate::clock::Clock;

/// How long either channel keeps an alert visible.
pub const ALERT_TIMEOUT_MS: u64 = 5_000;

/// The seam engines emit through. Implementations must not fail.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// System notification permission, evaluated once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// A visible in-process alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub shown_at_ms: u64,
}

/// In-process alert surface used when the system channel is unavailable.
/// Holds at most one alert; a display layer polls [`FallbackAlert::current`]
/// which reports nothing once the alert has timed out.
pub struct FallbackAlert {
    clock: Arc<dyn Clock>,
    current: Mutex<Option<Alert>>,
}

impl FallbackAlert {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            current: Mutex::new(None),
        }
    }

    pub fn show(&self, title: &str, message: &str) {
        let alert = Alert {
            title: title.to_string(),
            message: message.to_string(),
            shown_at_ms: self.clock.now_ms(),
        };
        eprintln!("[{}] {}", alert.title, alert.message);
        *self.lock() = Some(alert);
    }

    /// The alert still on screen, if any. Auto-dismisses after
    /// [`ALERT_TIMEOUT_MS`] of clock time.
    pub fn current(&self) -> Option<Alert> {
        let mut slot = self.lock();
        match &*slot {
            Some(alert) if self.clock.now_ms().saturating_sub(alert.shown_at_ms) >= ALERT_TIMEOUT_MS => {
                *slot = None;
                None
            }
            other => other.clone(),
        }
    }

    pub fn dismiss(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Alert>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Delivers `(title, message)` alerts: system notification when permitted,
/// in-process fallback otherwise.
pub struct NotificationGateway {
    permission: Permission,
    fallback: FallbackAlert,
}

impl NotificationGateway {
    /// `enabled` comes from the notification config; when false every call
    /// goes straight to the fallback, mirroring a denied permission.
    pub fn new(enabled: bool, clock: Arc<dyn Clock>) -> Self {
        let permission = if enabled {
            Permission::Granted
        } else {
            Permission::Denied
        };
        Self {
            permission,
            fallback: FallbackAlert::new(clock),
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn fallback(&self) -> &FallbackAlert {
        &self.fallback
    }

    fn try_system(title: &str, message: &str) -> Result<(), notify_rust::error::Error> {
        notify_rust::Notification::new()
            .summary(title)
            .body(message)
            .timeout(notify_rust::Timeout::Milliseconds(ALERT_TIMEOUT_MS as u32))
            .show()
            .map(|_| ())
    }
}

impl Notifier for NotificationGateway {
    fn notify(&self, title: &str, message: &str) {
        if self.permission == Permission::Granted {
            match Self::try_system(title, message) {
                Ok(()) => return,
                Err(e) => warn!("system notification failed, using fallback: {e}"),
            }
        }
        self.fallback.show(title, message);
    }
}
