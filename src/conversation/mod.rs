//! Conversation model and state
//!
//! This module contains the conversation data types, the insertion-ordered
//! conversation store, and the application state that tracks which
//! conversation is active.

pub mod state;
pub mod store;

pub use state::ChatState;
pub use store::ConversationStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to a conversation before its first message
pub const DEFAULT_TITLE: &str = "New chat";

/// Number of characters of the first question kept in a conversation title
pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;

/// Opaque, time-derived conversation identifier
///
/// Identifiers have the form `chat_<unix-millis>`. Callers should treat them
/// as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap an existing identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the identifier for a given unix timestamp in milliseconds
    ///
    /// # Examples
    ///
    /// ```
    /// use gemini_chat::conversation::ConversationId;
    ///
    /// let id = ConversationId::from_millis(1_700_000_000_000);
    /// assert_eq!(id.as_str(), "chat_1700000000000");
    /// ```
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("chat_{}", millis))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for ConversationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Text typed by the user
    User,
    /// Answer (or error notice) attributed to the model
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message
    pub sender: Sender,
    /// Message body, stored verbatim
    pub text: String,
}

impl Message {
    /// Create a user-authored message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    /// Create a model-authored message
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
        }
    }
}

/// A titled, append-only sequence of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Display title, derived from the first message
    pub title: String,
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Create an empty conversation with the placeholder title
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    /// Messages in the order they were appended
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message; the first message also sets the title
    pub(crate) fn push(&mut self, message: Message, title_max_chars: usize) {
        if self.messages.is_empty() {
            self.title = derive_title(&message.text, title_max_chars);
        }
        self.messages.push(message);
    }
}

/// Derive a conversation title from its first message
///
/// Keeps the first `max_chars` characters and appends `...` when the text was
/// longer. Lengths are counted in characters, not bytes.
///
/// # Examples
///
/// ```
/// use gemini_chat::conversation::derive_title;
///
/// assert_eq!(derive_title("short", 30), "short");
/// assert_eq!(derive_title("abcdef", 3), "abc...");
/// ```
pub fn derive_title(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_of_long_question_is_truncated() {
        let question = "Hello world, this is a long question exceeding thirty chars";
        let title = derive_title(question, DEFAULT_TITLE_MAX_CHARS);
        assert_eq!(title, "Hello world, this is a long qu...");
        assert_eq!(title, format!("{}...", &question[..30]));
    }

    #[test]
    fn test_title_of_exactly_thirty_chars_has_no_ellipsis() {
        let question = "a".repeat(30);
        assert_eq!(derive_title(&question, 30), question);
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let question = "ç".repeat(31);
        let title = derive_title(&question, 30);
        assert_eq!(title, format!("{}...", "ç".repeat(30)));
    }

    #[test]
    fn test_first_push_sets_title() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.title, DEFAULT_TITLE);

        conversation.push(Message::user("What is Rust?"), 30);
        conversation.push(Message::ai("A language."), 30);

        assert_eq!(conversation.title, "What is Rust?");
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_message_serializes_with_lowercase_sender() {
        let json = serde_json::to_string(&Message::ai("42")).unwrap();
        assert_eq!(json, r#"{"sender":"ai","text":"42"}"#);

        let parsed: Message = serde_json::from_str(r#"{"sender":"user","text":"hi"}"#).unwrap();
        assert_eq!(parsed, Message::user("hi"));
    }

    #[test]
    fn test_conversation_id_display() {
        let id = ConversationId::from_millis(42);
        assert_eq!(id.to_string(), "chat_42");
        assert_eq!(ConversationId::from("chat_42"), id);
    }
}
