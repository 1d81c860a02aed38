//! Configuration commands.

use std::error::Error;

use clap::Subcommand;
use focusdesk_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole configuration as TOML
    Show,
    /// Get a single value by dot-separated key (e.g. `timer.focus_min`)
    Get { key: String },
    /// Set a value by key and persist
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => match Config::load_or_default().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown config key '{key}'").into()),
        },
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
    }

    Ok(())
}
