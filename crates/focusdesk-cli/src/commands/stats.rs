//! Statistics commands.

use std::error::Error;

use clap::Subcommand;
use focusdesk_core::StatsTracker;

use super::{context, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print today's counters, streak and achievements
    Show {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn Error>> {
    let ctx = context()?;
    // Constructing the tracker applies the daily rollover.
    let tracker = StatsTracker::new(ctx.repo, ctx.clock);
    let state = tracker.state();

    match action {
        StatsAction::Show { json } => {
            if json {
                print_json(state)?;
            } else {
                println!("tasks today:      {}", state.tasks_today);
                println!("tasks this week:  {}", state.tasks_this_week);
                println!("pomodoros today:  {}", state.pomodoros_today);
                println!("current streak:   {}", state.current_streak);
                println!("achievements:");
                for achievement in state.achievements.iter().rev().take(3) {
                    println!("  {achievement}");
                }
            }
        }
    }

    Ok(())
}
