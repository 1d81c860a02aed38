use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusdesk-cli", version, about = "Focusdesk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Health reminder control (hydration / eye rest)
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Task list (the stats collaborator surface)
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Usage statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Live mode: run tickers and reminders until Ctrl-C
    Run {
        /// Also start the pomodoro countdown immediately
        #[arg(long)]
        start_timer: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Run { start_timer } => commands::run::run(start_timer).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timer_subcommands() {
        assert!(Cli::try_parse_from(["focusdesk-cli", "timer", "start"]).is_ok());
        assert!(Cli::try_parse_from(["focusdesk-cli", "timer", "status"]).is_ok());
        assert!(Cli::try_parse_from([
            "focusdesk-cli", "timer", "settings", "--focus", "50", "--cycles", "6"
        ])
        .is_ok());
    }

    #[test]
    fn parses_reminder_subcommands() {
        assert!(Cli::try_parse_from([
            "focusdesk-cli", "reminder", "start", "water", "--interval", "30"
        ])
        .is_ok());
        assert!(Cli::try_parse_from([
            "focusdesk-cli", "reminder", "start", "eye", "--interval", "20", "--rest", "30"
        ])
        .is_ok());
        assert!(Cli::try_parse_from(["focusdesk-cli", "reminder", "stop", "eye"]).is_ok());
        assert!(Cli::try_parse_from(["focusdesk-cli", "reminder", "status"]).is_ok());
    }

    #[test]
    fn parses_task_and_stats_subcommands() {
        assert!(Cli::try_parse_from([
            "focusdesk-cli", "task", "add", "write report", "--priority", "high"
        ])
        .is_ok());
        assert!(Cli::try_parse_from(["focusdesk-cli", "task", "list", "--json"]).is_ok());
        assert!(Cli::try_parse_from(["focusdesk-cli", "stats", "show"]).is_ok());
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["focusdesk-cli", "frobnicate"]).is_err());
    }
}
