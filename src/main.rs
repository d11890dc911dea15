//! gemini-chat - terminal chat client for the Gemini API
//!
#![doc = "gemini-chat - terminal chat client for the Gemini API"]
#![doc = "Main entry point for the gemini-chat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gemini_chat::cli::{Cli, Commands};
use gemini_chat::commands;
use gemini_chat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    let ephemeral = cli.ephemeral;

    // Execute command
    match cli.command {
        Commands::Chat { model, api_key } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            commands::chat::run_chat(config, model, api_key, ephemeral).await
        }
        Commands::Ask {
            question,
            model,
            api_key,
            new,
        } => {
            tracing::info!("Asking a single question");
            commands::ask::run_ask(config, question, model, api_key, new, ephemeral).await
        }
        Commands::History { command } => {
            commands::history::handle_history(&config, command, ephemeral)
        }
        Commands::Models { command } => commands::models::handle_models(&config, command),
    }
}

/// Logs go to stderr so answers on stdout stay pipeable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "gemini_chat=debug"
    } else {
        "gemini_chat=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
