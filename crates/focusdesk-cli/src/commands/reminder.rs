//! Hydration and eye-rest reminder commands.
//!
//! One-shot commands flag a reminder active/inactive and persist its
//! configuration; the recurring notifications only fire while the `run`
//! live mode is up. `water log` tracks glasses drunk alongside the
//! hydration reminder.

use std::error::Error;

use clap::{Subcommand, ValueEnum};
use focusdesk_core::{ReminderKind, ReminderScheduler, RemindersConfig};
use serde::Serialize;

use super::{context, print_json, AppContext};

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Water,
    Eye,
}

impl KindArg {
    fn kind(self) -> ReminderKind {
        match self {
            KindArg::Water => ReminderKind::Hydration,
            KindArg::Eye => ReminderKind::EyeRest,
        }
    }
}

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Activate a reminder
    Start {
        kind: KindArg,
        /// Minutes between notifications (defaults to the configured value)
        #[arg(long)]
        interval: Option<u32>,
        /// Eye-rest duration in seconds (eye reminder only)
        #[arg(long)]
        rest: Option<u32>,
    },
    /// Deactivate a reminder
    Stop { kind: KindArg },
    /// Print the status of both reminders and their counters
    Status,
    /// Log a glass of water
    Drink,
    /// Remove a mistakenly logged glass (floors at zero)
    UndoDrink,
}

#[derive(Serialize)]
struct StatusReport {
    water: focusdesk_core::ReminderStatus,
    eye: focusdesk_core::ReminderStatus,
    water_count: u32,
    eye_break_count: u32,
}

/// Fill unspecified start arguments from the `[reminders]` config
/// section: the kind's default interval, and the configured eye-rest
/// seconds for the eye reminder.
fn start_args(
    kind: ReminderKind,
    interval: Option<u32>,
    rest: Option<u32>,
    config: &RemindersConfig,
) -> (u32, Option<u32>) {
    let interval = interval.unwrap_or(match kind {
        ReminderKind::Hydration => config.water_interval_min,
        ReminderKind::EyeRest => config.eye_interval_min,
    });
    let rest = match kind {
        ReminderKind::EyeRest => rest.or(Some(config.eye_rest_secs)),
        ReminderKind::Hydration => rest,
    };
    (interval, rest)
}

fn scheduler(ctx: &AppContext, kind: ReminderKind) -> ReminderScheduler {
    ReminderScheduler::new(
        kind,
        ctx.repo.clone(),
        ctx.notifier.clone(),
        ctx.clock.clone(),
    )
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn Error>> {
    let ctx = context()?;

    match action {
        ReminderAction::Start {
            kind,
            interval,
            rest,
        } => {
            let kind = kind.kind();
            let (interval, rest) = start_args(kind, interval, rest, &ctx.config.reminders);
            let event = scheduler(&ctx, kind).start(interval, rest);
            print_json(&event)?;
        }
        ReminderAction::Stop { kind } => {
            let event = scheduler(&ctx, kind.kind()).stop();
            print_json(&event)?;
        }
        ReminderAction::Status => {
            let now_ms = ctx.clock.now_ms();
            let report = StatusReport {
                water: scheduler(&ctx, ReminderKind::Hydration).status_snapshot(now_ms),
                eye: scheduler(&ctx, ReminderKind::EyeRest).status_snapshot(now_ms),
                water_count: ctx.repo.water_count(),
                eye_break_count: ctx.repo.eye_break_count(),
            };
            print_json(&report)?;
        }
        ReminderAction::Drink => {
            let count = ctx.repo.water_count() + 1;
            ctx.repo.set_water_count(count)?;
            println!("water count: {count}");
        }
        ReminderAction::UndoDrink => {
            let count = ctx.repo.water_count().saturating_sub(1);
            ctx.repo.set_water_count(count)?;
            println!("water count: {count}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RemindersConfig {
        RemindersConfig {
            water_interval_min: 45,
            eye_interval_min: 25,
            eye_rest_secs: 40,
        }
    }

    #[test]
    fn start_args_fill_interval_from_config() {
        let cfg = config();
        assert_eq!(start_args(ReminderKind::Hydration, None, None, &cfg).0, 45);
        assert_eq!(start_args(ReminderKind::EyeRest, None, None, &cfg).0, 25);
        assert_eq!(start_args(ReminderKind::Hydration, Some(30), None, &cfg).0, 30);
    }

    #[test]
    fn start_args_default_eye_rest_from_config() {
        let cfg = config();
        assert_eq!(start_args(ReminderKind::EyeRest, None, None, &cfg).1, Some(40));
        assert_eq!(
            start_args(ReminderKind::EyeRest, None, Some(15), &cfg).1,
            Some(15)
        );
        // Hydration has no rest duration to default.
        assert_eq!(start_args(ReminderKind::Hydration, None, None, &cfg).1, None);
    }
}
