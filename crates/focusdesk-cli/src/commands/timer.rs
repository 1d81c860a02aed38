//! Pomodoro timer commands.
//!
//! These are one-shot state transitions: they mutate the persisted state
//! and exit. Actual second-by-second ticking only happens inside the
//! `run` live mode, which rehydrates the same state.

use std::error::Error;

use clap::Subcommand;
use focusdesk_core::PomodoroEngine;

use super::{context, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown, keeping the remaining time
    Pause,
    /// Reset to a fresh focus session at cycle 1
    Reset,
    /// Print the current timer state
    Status,
    /// Change session durations (minutes) and the cycle count
    Settings {
        #[arg(long)]
        focus: Option<u32>,
        #[arg(long = "break")]
        break_min: Option<u32>,
        #[arg(long)]
        long_break: Option<u32>,
        #[arg(long)]
        cycles: Option<u32>,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn Error>> {
    let ctx = context()?;
    let mut engine = PomodoroEngine::with_defaults(
        ctx.repo,
        ctx.notifier,
        ctx.clock,
        ctx.config.timer.initial_state(),
    );

    match action {
        TimerAction::Start => {
            if let Some(event) = engine.start() {
                print_json(&event)?;
            } else {
                println!("timer is already running");
            }
        }
        TimerAction::Pause => {
            if let Some(event) = engine.pause() {
                print_json(&event)?;
            } else {
                println!("timer is not running");
            }
        }
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                print_json(&event)?;
            }
        }
        TimerAction::Status => {
            print_json(&engine.snapshot())?;
        }
        TimerAction::Settings {
            focus,
            break_min,
            long_break,
            cycles,
        } => {
            // Unspecified values keep their current settings.
            let current = engine.state().clone();
            let event = engine.change_settings(
                focus.unwrap_or(current.settings.focus_min),
                break_min.unwrap_or(current.settings.break_min),
                long_break.unwrap_or(current.settings.long_break_min),
                cycles.unwrap_or(current.total_cycles),
            );
            if let Some(event) = event {
                print_json(&event)?;
            }
        }
    }

    Ok(())
}
