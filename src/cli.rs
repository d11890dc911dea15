//! Command-line interface definition for gemini-chat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, history
//! management, and model listing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gemini-chat - terminal chat client for the Gemini API
///
/// Keeps a history of conversations, one of which is active at a time.
/// Questions are appended to the active conversation.
#[derive(Parser, Debug, Clone)]
#[command(name = "gemini-chat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the conversation database location
    #[arg(long, env = "GEMINI_CHAT_STORAGE")]
    pub storage_path: Option<PathBuf>,

    /// Keep conversations in memory only; nothing is written to disk
    #[arg(long)]
    pub ephemeral: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session on the active conversation
    Chat {
        /// Model to use (must be listed in api.available_models)
        #[arg(short, long)]
        model: Option<String>,

        /// API key; remembered for later sessions
        #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Ask a single question in the active conversation and print the answer
    Ask {
        /// Question text
        question: String,

        /// Model to use (must be listed in api.available_models)
        #[arg(short, long)]
        model: Option<String>,

        /// API key; remembered for later sessions
        #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Start a new conversation for this question
        #[arg(short, long)]
        new: bool,
    },

    /// Manage stored conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Show selectable models
    Models {
        /// Model subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Conversation history subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryCommand {
    /// List conversations that have messages
    List,

    /// Print a conversation transcript (the active one by default)
    Show {
        /// Conversation id or unique prefix
        id: Option<String>,
    },

    /// Make a conversation active
    Select {
        /// Conversation id or unique prefix
        id: String,
    },

    /// Create an empty conversation and make it active
    New,

    /// Delete the active conversation
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Model subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ModelCommand {
    /// List selectable models
    List,

    /// Show the default model
    Current,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            ephemeral: false,
            command: Commands::Models {
                command: ModelCommand::List,
            },
        }
    }
}
