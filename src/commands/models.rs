//! Model commands for gemini-chat
//!
//! Models are not discovered remotely; the selectable set is
//! `api.available_models` from configuration.

use crate::cli::ModelCommand;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use prettytable::{row, Table};

/// Handle model commands
///
/// # Examples
///
/// ```no_run
/// use gemini_chat::cli::ModelCommand;
/// use gemini_chat::commands::models::handle_models;
/// use gemini_chat::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load("config/config.yaml", &Default::default())?;
/// handle_models(&config, ModelCommand::List)?;
/// # Ok(())
/// # }
/// ```
pub fn handle_models(config: &Config, command: ModelCommand) -> Result<()> {
    match command {
        ModelCommand::List => print_model_table(config, &config.api.model),
        ModelCommand::Current => {
            println!("Current model: {}", config.api.model.cyan());
        }
    }
    Ok(())
}

/// Print the selectable models, marking `current`
pub fn print_model_table(config: &Config, current: &str) {
    let table = model_table(config, current);
    println!("\nAvailable models:\n");
    table.printstd();
    println!();
}

fn model_table(config: &Config, current: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Model Name", "Default", "Current"]);

    for model in &config.api.available_models {
        let default = format_flag(model == &config.api.model);
        let active = format_flag(model == current);
        table.add_row(row![model, default, active]);
    }

    table
}

fn format_flag(value: bool) -> String {
    if value {
        "Yes".to_string()
    } else {
        String::new()
    }
}
