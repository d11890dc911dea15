/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `chat`    - Interactive chat on the active conversation
- `ask`     - One question, one answer
- `history` - Listing, showing, selecting, and deleting conversations
- `models`  - Selectable models

Handlers are thin: all state changes go through `ChatSession`.
*/

use crate::client::{AnswerClient, GeminiClient};
use crate::config::Config;
use crate::error::Result;
use crate::session::ChatSession;
use crate::storage::{MemoryStore, SqliteStore, StateRepository};
use std::io::Write;

// Slash command parser for chat mode
pub mod special_commands;

// Conversation history commands
pub mod history;

// Model listing commands
pub mod models;

/// Open the repository selected by configuration
///
/// `ephemeral` keeps everything in memory. Otherwise `storage.path` is used
/// when set, and the platform data directory when not.
pub fn open_repository(config: &Config, ephemeral: bool) -> Result<StateRepository> {
    if ephemeral {
        tracing::info!("Ephemeral mode: conversations will not be saved");
        return Ok(StateRepository::new(MemoryStore::new()));
    }
    let store = match &config.storage.path {
        Some(path) => SqliteStore::new_with_path(path.clone())?,
        None => SqliteStore::new()?,
    };
    Ok(StateRepository::new(store))
}

/// Open a session backed by the Gemini client
pub fn open_session(config: &Config, ephemeral: bool) -> Result<ChatSession<GeminiClient>> {
    let repo = open_repository(config, ephemeral)?;
    let client = GeminiClient::new(&config.api)?;
    ChatSession::open(config, repo, client)
}

/// Apply a `--model` override after checking it is selectable
pub fn apply_model_override<C: AnswerClient>(
    config: &Config,
    session: &mut ChatSession<C>,
    model: Option<String>,
) -> Result<()> {
    if let Some(model) = model {
        config.validate_model(&model)?;
        session.set_model(model);
    }
    Ok(())
}

/// Pick the API key for this run
///
/// A non-blank key from the command line (or `GEMINI_API_KEY`) is remembered
/// for later runs; otherwise the remembered key is used.
pub fn resolve_api_key<C: AnswerClient>(
    session: &ChatSession<C>,
    provided: Option<String>,
) -> Result<Option<String>> {
    match provided.map(|k| k.trim().to_string()) {
        Some(key) if !key.is_empty() => {
            session.remember_api_key(&key)?;
            Ok(Some(key))
        }
        _ => session.saved_api_key(),
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

// Interactive chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline loop on the active conversation. Lines starting with
    //! `/` are chat commands; everything else is submitted as a question.

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::client::AnswerClient;
    use crate::config::Config;
    use crate::error::{ChatError, Result};
    use crate::render::{char_counter, ChatView, TerminalRenderer};
    use crate::session::{ChatSession, SubmitOutcome};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::io::Write;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `model` - Optional model override
    /// * `api_key` - API key from the command line or environment
    /// * `ephemeral` - Keep conversations in memory only
    pub async fn run_chat(
        config: Config,
        model: Option<String>,
        api_key: Option<String>,
        ephemeral: bool,
    ) -> Result<()> {
        let mut session = super::open_session(&config, ephemeral)?;
        super::apply_model_override(&config, &mut session, model)?;
        let mut api_key = super::resolve_api_key(&session, api_key)?;

        let mut rl = DefaultEditor::new().map_err(|e| ChatError::Readline(e.to_string()))?;
        let mut renderer = TerminalRenderer::new(std::io::stdout());

        print_welcome_banner(session.model(), api_key.is_some());
        renderer.render(session.state())?;

        loop {
            let prompt = format!("[{}] >> ", session.model());
            let line = match rl.readline(&prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    return Err(ChatError::Readline(err.to_string()).into());
                }
            };

            let command = match parse_special_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    renderer.print_error(&e.to_string())?;
                    continue;
                }
            };

            match command {
                SpecialCommand::None => {
                    rl.add_history_entry(line.trim())
                        .map_err(|e| ChatError::Readline(e.to_string()))?;
                    submit_line(&mut session, &mut renderer, &line, api_key.as_deref()).await?;
                }
                SpecialCommand::Exit => break,
                SpecialCommand::Help => print_help(),
                SpecialCommand::NewChat => {
                    session.new_conversation()?;
                    renderer.render(session.state())?;
                    println!("{}", "Started a new conversation.".green());
                }
                SpecialCommand::ListChats => renderer.print_sidebar(session.state())?,
                SpecialCommand::Switch(target) => {
                    match switch_target(&session, &target)
                        .and_then(|id| session.select_conversation(&id))
                    {
                        Ok(()) => renderer.render(session.state())?,
                        Err(e) => renderer.print_error(&e.to_string())?,
                    }
                }
                SpecialCommand::ClearChat => {
                    let answer = match rl.readline("Delete the current conversation? [y/N] ") {
                        Ok(answer) => answer,
                        Err(ReadlineError::Interrupted | ReadlineError::Eof) => String::new(),
                        Err(err) => return Err(ChatError::Readline(err.to_string()).into()),
                    };
                    if super::is_yes(&answer) {
                        session.delete_active()?;
                        renderer.render(session.state())?;
                        println!("{}", "Conversation deleted.".green());
                    }
                }
                SpecialCommand::SwitchModel(name) => match config.validate_model(&name) {
                    Ok(()) => {
                        session.set_model(name);
                        println!("Model: {}", session.model().cyan());
                    }
                    Err(e) => renderer.print_error(&e.to_string())?,
                },
                SpecialCommand::ListModels => {
                    super::models::print_model_table(&config, session.model())
                }
                SpecialCommand::SetApiKey(key) => {
                    session.remember_api_key(&key)?;
                    api_key = Some(key.trim().to_string());
                    println!("{}", "API key saved.".green());
                }
                SpecialCommand::Show => {
                    renderer.invalidate();
                    renderer.render(session.state())?;
                }
            }
        }

        tracing::info!("Chat session ended");
        Ok(())
    }

    /// Validate, record, send, and render one question
    ///
    /// Validation and request failures are shown inline; only storage and
    /// terminal failures end the loop.
    async fn submit_line<C: AnswerClient, W: Write>(
        session: &mut ChatSession<C>,
        renderer: &mut TerminalRenderer<W>,
        line: &str,
        api_key: Option<&str>,
    ) -> Result<()> {
        let pending = match session.begin_submit(line, api_key.unwrap_or_default()) {
            Ok(pending) => pending,
            Err(e) => match e.downcast_ref::<ChatError>() {
                Some(ChatError::Validation(v)) => {
                    renderer.print_error(&v.to_string())?;
                    if api_key.is_none() {
                        renderer.print_note("Set a key with /key <api_key>")?;
                    }
                    return Ok(());
                }
                _ => return Err(e),
            },
        };

        renderer.render(session.state())?;
        renderer.print_note(&char_counter(
            &pending.question,
            session.max_question_length(),
        ))?;
        renderer.print_note("Loading...")?;

        let answer = session.request(&pending).await;
        let outcome = session.finish_submit(&pending, answer)?;
        if let SubmitOutcome::Failed { message, .. } = &outcome {
            renderer.print_error(message)?;
        }
        renderer.render(session.state())?;
        Ok(())
    }

    /// Resolve `/switch` input: a 1-based list number, an id, or an id prefix
    fn switch_target<C: AnswerClient>(
        session: &ChatSession<C>,
        target: &str,
    ) -> Result<crate::conversation::ConversationId> {
        if let Ok(n) = target.parse::<usize>() {
            let sidebar = ChatView::from_state(session.state()).sidebar;
            if let Some(entry) = n.checked_sub(1).and_then(|i| sidebar.get(i)) {
                return Ok(entry.id.clone());
            }
        }
        session.resolve(target)
    }

    fn print_welcome_banner(model: &str, has_key: bool) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              Gemini Chat Interactive Mode                    ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model:   {}", model.cyan());
        if has_key {
            println!("API key: {}\n", "saved".green());
        } else {
            println!(
                "API key: {} (use {} or set GEMINI_API_KEY)\n",
                "missing".yellow(),
                "/key <api_key>".cyan()
            );
        }
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

}

// One-shot question handler
pub mod ask {
    //! Ask a single question in the active conversation.

    use crate::config::Config;
    use crate::error::{ChatError, Result};
    use crate::session::SubmitOutcome;
    use crate::validation::validate_submission;

    /// Submit `question`, print the answer, and exit
    ///
    /// With `new`, the question starts a new conversation. Validation runs
    /// before that conversation is created, so a rejected question leaves
    /// the stored state untouched.
    ///
    /// # Errors
    ///
    /// Returns the validation message when a field is missing, and the
    /// inline error message when the request fails.
    pub async fn run_ask(
        config: Config,
        question: String,
        model: Option<String>,
        api_key: Option<String>,
        new: bool,
        ephemeral: bool,
    ) -> Result<()> {
        let mut session = super::open_session(&config, ephemeral)?;
        super::apply_model_override(&config, &mut session, model)?;
        let api_key = super::resolve_api_key(&session, api_key)?.unwrap_or_default();

        validate_submission(&question, &api_key, session.max_question_length())
            .map_err(ChatError::Validation)?;

        if new {
            session.new_conversation()?;
        }

        match session.submit(&question, &api_key).await? {
            SubmitOutcome::Answered(text) => {
                println!("{}", text);
                Ok(())
            }
            SubmitOutcome::Failed { message, .. } => Err(anyhow::anyhow!(message)),
        }
    }
}
