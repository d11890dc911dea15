//! Rendering of conversation state to the terminal
//!
//! `ChatView` is a pure projection of `ChatState`. `reconcile` compares the
//! previously rendered view with the next one and produces the minimal list
//! of `RenderOp`s: appended bubbles only when the active transcript grew, a
//! full rebuild otherwise. `TerminalRenderer` applies those ops to any
//! writer.

use crate::conversation::{ChatState, Conversation, ConversationId, Message, Sender};
use colored::Colorize;
use std::io::Write;

/// One message bubble of the active transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    /// Styling is chosen from the sender
    pub sender: Sender,
    /// Text shown in the bubble
    pub text: String,
}

impl From<&Message> for Bubble {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender,
            text: message.text.clone(),
        }
    }
}

/// One entry of the conversation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Conversation the entry switches to
    pub id: ConversationId,
    /// Conversation title
    pub title: String,
    /// True for the active conversation
    pub active: bool,
}

/// Everything the terminal shows for a given state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    /// Active conversation, if any
    pub active_id: Option<ConversationId>,
    /// Active conversation's messages, in order
    pub transcript: Vec<Bubble>,
    /// Non-empty conversations, in insertion order
    pub sidebar: Vec<SidebarEntry>,
    /// The sidebar is shown only once some conversation has content
    pub show_sidebar: bool,
}

impl ChatView {
    /// Project a state into a view
    ///
    /// # Examples
    ///
    /// ```
    /// use gemini_chat::conversation::{ChatState, Sender};
    /// use gemini_chat::render::ChatView;
    ///
    /// let mut state = ChatState::new();
    /// let id = state.create_conversation(1);
    /// assert!(!ChatView::from_state(&state).show_sidebar);
    ///
    /// state.append_message(&id, Sender::User, "hi").unwrap();
    /// let view = ChatView::from_state(&state);
    /// assert!(view.show_sidebar);
    /// assert_eq!(view.sidebar[0].title, "hi");
    /// ```
    pub fn from_state(state: &ChatState) -> Self {
        let active_id = state.active_id().cloned();

        let transcript = state
            .active_conversation()
            .map(|c| c.messages().iter().map(Bubble::from).collect())
            .unwrap_or_default();

        let sidebar = state
            .conversations()
            .iter()
            .filter(|(_, c)| !c.is_empty())
            .map(|(id, c)| SidebarEntry {
                id: id.clone(),
                title: c.title.clone(),
                active: active_id.as_ref() == Some(id),
            })
            .collect();

        Self {
            active_id,
            transcript,
            sidebar,
            show_sidebar: state.has_content(),
        }
    }
}

/// A single change to apply to the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    /// Discard the displayed transcript before rebuilding it
    ClearTranscript,
    /// Display one bubble after the current ones
    Bubble(Bubble),
    /// Display the conversation list
    ShowSidebar(Vec<SidebarEntry>),
    /// Hide the conversation list
    HideSidebar,
}

/// Compute the ops that turn `prev` into `next`
///
/// With no previous view everything is drawn. When the active conversation
/// is unchanged and its transcript extends the displayed one, only the new
/// bubbles are emitted.
pub fn reconcile(prev: Option<&ChatView>, next: &ChatView) -> Vec<RenderOp> {
    let mut ops = Vec::new();

    let sidebar_changed = match prev {
        Some(p) => p.show_sidebar != next.show_sidebar || p.sidebar != next.sidebar,
        None => true,
    };
    if sidebar_changed {
        if next.show_sidebar {
            ops.push(RenderOp::ShowSidebar(next.sidebar.clone()));
        } else if prev.map_or(false, |p| p.show_sidebar) {
            ops.push(RenderOp::HideSidebar);
        }
    }

    let appended_from = prev.and_then(|p| {
        let extends = p.active_id == next.active_id
            && p.transcript.len() <= next.transcript.len()
            && next.transcript[..p.transcript.len()] == p.transcript[..];
        extends.then_some(p.transcript.len())
    });

    let start = match appended_from {
        Some(start) => start,
        None => {
            if prev.is_some() {
                ops.push(RenderOp::ClearTranscript);
            }
            0
        }
    };
    ops.extend(next.transcript[start..].iter().cloned().map(RenderOp::Bubble));

    ops
}

/// Writes render ops to a terminal-like writer
///
/// Remembers the last view so callers can simply pass every new state.
pub struct TerminalRenderer<W: Write> {
    out: W,
    last: Option<ChatView>,
}

impl<W: Write> TerminalRenderer<W> {
    /// Create a renderer that has drawn nothing yet
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Bring the display in line with `state`
    pub fn render(&mut self, state: &ChatState) -> std::io::Result<()> {
        let next = ChatView::from_state(state);
        let ops = reconcile(self.last.as_ref(), &next);
        for op in &ops {
            self.apply(op)?;
        }
        self.out.flush()?;
        self.last = Some(next);
        Ok(())
    }

    /// Forget what was drawn, so the next render redraws everything
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Print the conversation list regardless of what changed
    pub fn print_sidebar(&mut self, state: &ChatState) -> std::io::Result<()> {
        let view = ChatView::from_state(state);
        if view.show_sidebar {
            write_sidebar(&mut self.out, &view.sidebar)
        } else {
            writeln!(self.out, "{}", "No saved conversations yet.".yellow())
        }
    }

    /// Print one conversation's title and full transcript
    pub fn print_conversation(
        &mut self,
        id: &ConversationId,
        conversation: &Conversation,
    ) -> std::io::Result<()> {
        writeln!(
            self.out,
            "{} {}",
            conversation.title.bold(),
            format!("({})", id).dimmed()
        )?;
        writeln!(self.out)?;
        if conversation.is_empty() {
            writeln!(self.out, "{}", "No messages yet.".yellow())?;
        }
        for message in conversation.messages() {
            write_bubble(&mut self.out, &Bubble::from(message))?;
        }
        self.out.flush()
    }

    /// Print a dimmed status line, e.g. the character counter
    pub fn print_note(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", message.dimmed())?;
        self.out.flush()
    }

    /// Print an inline error banner
    pub fn print_error(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", message.red())
    }

    /// Consume the renderer, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn apply(&mut self, op: &RenderOp) -> std::io::Result<()> {
        match op {
            RenderOp::ClearTranscript => {
                writeln!(self.out, "{}", "─".repeat(40).dimmed())
            }
            RenderOp::Bubble(bubble) => write_bubble(&mut self.out, bubble),
            RenderOp::ShowSidebar(entries) => write_sidebar(&mut self.out, entries),
            RenderOp::HideSidebar => {
                writeln!(self.out, "{}", "No saved conversations.".dimmed())
            }
        }
    }
}

fn write_bubble<W: Write>(out: &mut W, bubble: &Bubble) -> std::io::Result<()> {
    match bubble.sender {
        Sender::User => writeln!(out, "{} {}", "You:".cyan().bold(), bubble.text),
        Sender::Ai => {
            // AI text is pre-formatted; print it verbatim on its own lines.
            writeln!(out, "{}", "AI:".green().bold())?;
            writeln!(out, "{}", bubble.text)?;
            writeln!(out)
        }
    }
}

fn write_sidebar<W: Write>(out: &mut W, entries: &[SidebarEntry]) -> std::io::Result<()> {
    writeln!(out, "{}", "Conversations:".bold())?;
    for (idx, entry) in entries.iter().enumerate() {
        let marker = if entry.active { "*" } else { " " };
        let line = format!("{} {:>2}. {}", marker, idx + 1, entry.title);
        if entry.active {
            writeln!(out, "{}", line.cyan())?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    writeln!(out)
}

/// Character counter shown for the question input, e.g. `12 / 2000`
pub fn char_counter(text: &str, max: usize) -> String {
    format!("{} / {}", text.chars().count(), max)
}
