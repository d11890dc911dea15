//! Slash commands available inside the interactive chat
//!
//! Any input that does not start with `/` (other than `exit` and `quit`) is a
//! question and parses to `SpecialCommand::None`.

use colored::Colorize;
use thiserror::Error;

/// Errors produced while parsing a slash command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Input started with `/` but names no known command
    #[error("Unknown command: {0}. Type '/help' for available commands")]
    UnknownCommand(String),

    /// Command requires an argument that was not given
    #[error("Missing argument for {command}. Usage: {usage}")]
    MissingArgument {
        /// Command that was typed
        command: String,
        /// Usage line for the command
        usage: String,
    },
}

/// A parsed chat-mode command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Create an empty conversation and make it active
    NewChat,
    /// Print the conversation list
    ListChats,
    /// Switch to a conversation by list number, id, or id prefix
    Switch(String),
    /// Delete the active conversation after confirmation
    ClearChat,
    /// Switch the model used for subsequent questions
    SwitchModel(String),
    /// List selectable models
    ListModels,
    /// Replace the remembered API key
    SetApiKey(String),
    /// Redraw the active transcript
    Show,
    /// Print command help
    Help,
    /// Leave the chat
    Exit,
    /// Not a command; the input is a question
    None,
}

/// Parse one line of chat input
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for unrecognized `/` input and
/// `CommandError::MissingArgument` when a command's argument is absent.
///
/// # Examples
///
/// ```
/// use gemini_chat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewChat);
/// assert_eq!(
///     parse_special_command("/switch 2").unwrap(),
///     SpecialCommand::Switch("2".to_string())
/// );
/// assert_eq!(parse_special_command("What is 6 x 7?").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, arg)) => (command.to_lowercase(), arg.trim()),
        None => (lower.clone(), ""),
    };

    match command.as_str() {
        "/new" => Ok(SpecialCommand::NewChat),
        "/list" | "/chats" => Ok(SpecialCommand::ListChats),
        "/clear" | "/delete" => Ok(SpecialCommand::ClearChat),
        "/models" => Ok(SpecialCommand::ListModels),
        "/show" => Ok(SpecialCommand::Show),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),

        // API keys and ids are case-sensitive, so the original-case argument is kept.
        "/switch" => with_arg(arg, "/switch", "/switch <number|id>", SpecialCommand::Switch),
        "/model" => with_arg(arg, "/model", "/model <model_name>", SpecialCommand::SwitchModel),
        "/key" => with_arg(arg, "/key", "/key <api_key>", SpecialCommand::SetApiKey),

        _ => Err(CommandError::UnknownCommand(command)),
    }
}

fn with_arg(
    arg: &str,
    command: &str,
    usage: &str,
    build: fn(String) -> SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        })
    } else {
        Ok(build(arg.to_string()))
    }
}

/// Print the chat command reference
pub fn print_help() {
    println!("\n{}", "Chat commands:".bold());
    println!("  {}            Start a new conversation", "/new".cyan());
    println!("  {}           List saved conversations", "/list".cyan());
    println!("  {}  Switch conversation by list number or id", "/switch <n|id>".cyan());
    println!("  {}          Delete the current conversation", "/clear".cyan());
    println!("  {}   Use another model", "/model <name>".cyan());
    println!("  {}         List selectable models", "/models".cyan());
    println!("  {}      Replace the saved API key", "/key <key>".cyan());
    println!("  {}           Reprint the current conversation", "/show".cyan());
    println!("  {}           Show this help", "/help".cyan());
    println!("  {}           Leave the chat (also 'exit' or 'quit')\n", "/exit".cyan());
}
