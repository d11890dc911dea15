use crate::cli::HistoryCommand;
use crate::client::AnswerClient;
use crate::config::Config;
use crate::error::Result;
use crate::render::{ChatView, TerminalRenderer};
use crate::session::ChatSession;
use colored::Colorize;
use prettytable::{format, Table};
use std::io::Write;

/// Handle history commands against the configured storage
pub fn handle_history(config: &Config, command: HistoryCommand, ephemeral: bool) -> Result<()> {
    let mut session = super::open_session(config, ephemeral)?;
    let mut out = std::io::stdout();
    run_history(&mut session, command, &mut out, super::confirm)
}

/// Run one history command, writing to `out`
///
/// `confirm` is asked before a deletion unless `--yes` was given.
pub fn run_history<C, W, F>(
    session: &mut ChatSession<C>,
    command: HistoryCommand,
    out: &mut W,
    confirm: F,
) -> Result<()>
where
    C: AnswerClient,
    W: Write,
    F: FnOnce(&str) -> Result<bool>,
{
    match command {
        HistoryCommand::List => {
            let view = ChatView::from_state(session.state());

            if view.sidebar.is_empty() {
                writeln!(out, "{}", "No saved conversations yet.".yellow())?;
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "#".bold(),
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                ""
            ]);

            for (idx, entry) in view.sidebar.iter().enumerate() {
                let messages = session
                    .state()
                    .conversations()
                    .get(&entry.id)
                    .map_or(0, |c| c.len());
                let marker = if entry.active { "active" } else { "" };
                let number = idx + 1;

                table.add_row(prettytable::row![
                    number,
                    entry.id.as_str().cyan(),
                    entry.title,
                    messages,
                    marker.green()
                ]);
            }

            writeln!(out, "\nConversations:")?;
            table.print(out)?;
            writeln!(out)?;
            writeln!(
                out,
                "Use {} to switch conversations.",
                "gemini-chat history select <ID>".cyan()
            )?;
        }
        HistoryCommand::Show { id } => {
            let id = match id {
                Some(id) => session.resolve(&id)?,
                None => match session.state().active_id() {
                    Some(id) => id.clone(),
                    None => {
                        writeln!(out, "{}", "No active conversation.".yellow())?;
                        return Ok(());
                    }
                },
            };
            if let Some(conversation) = session.state().conversations().get(&id) {
                TerminalRenderer::new(&mut *out).print_conversation(&id, conversation)?;
            }
        }
        HistoryCommand::Select { id } => {
            let id = session.resolve(&id)?;
            session.select_conversation(&id)?;
            let title = session
                .state()
                .active_conversation()
                .map(|c| c.title.clone())
                .unwrap_or_default();
            writeln!(out, "{} {} ({})", "Active conversation:".green(), id, title)?;
        }
        HistoryCommand::New => {
            let id = session.new_conversation()?;
            writeln!(out, "{}", format!("Started conversation {}", id).green())?;
        }
        HistoryCommand::Delete { yes } => {
            let title = session
                .state()
                .active_conversation()
                .map(|c| c.title.clone())
                .unwrap_or_default();
            if !yes && !confirm(&format!("Delete conversation \"{}\"?", title))? {
                writeln!(out, "Cancelled.")?;
                return Ok(());
            }
            let id = session.delete_active()?;
            writeln!(out, "{}", format!("Deleted conversation {}", id).green())?;
        }
    }

    Ok(())
}
