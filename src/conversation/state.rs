//! Application state: the conversation store plus the active conversation
//!
//! Every transition validates its input before touching the state, so a
//! rejected transition leaves the state exactly as it was. Transitions never
//! persist anything themselves; `ChatSession` saves after each one.

use super::{Conversation, ConversationId, ConversationStore, Message, Sender};
use super::DEFAULT_TITLE_MAX_CHARS;
use crate::error::{ChatError, Result};

/// Conversation store and active-conversation pointer
///
/// Invariant: when `active_id` is `Some`, it names an entry of
/// `conversations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    conversations: ConversationStore,
    active_id: Option<ConversationId>,
    title_max_chars: usize,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Empty state with no active conversation
    pub fn new() -> Self {
        Self {
            conversations: ConversationStore::new(),
            active_id: None,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }

    /// Rebuild state from persisted parts, repairing the active pointer
    ///
    /// A missing or dangling active id falls back to the first stored
    /// conversation. An empty store gets a fresh empty conversation, which
    /// becomes active.
    ///
    /// # Examples
    ///
    /// ```
    /// use gemini_chat::conversation::{ChatState, ConversationStore};
    ///
    /// let state = ChatState::restore(ConversationStore::new(), None, 1_000);
    /// assert_eq!(state.active_id().unwrap().as_str(), "chat_1000");
    /// ```
    pub fn restore(
        conversations: ConversationStore,
        active_id: Option<ConversationId>,
        now_millis: i64,
    ) -> Self {
        let mut state = Self {
            conversations,
            active_id,
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        };

        let dangling = state
            .active_id
            .as_ref()
            .map_or(true, |id| !state.conversations.contains(id));
        if dangling {
            if let Some(id) = &state.active_id {
                tracing::warn!("Stored active conversation {} no longer exists", id);
            }
            state.active_id = state.conversations.first_id().cloned();
        }
        if state.active_id.is_none() {
            state.create_conversation(now_millis);
        }
        state
    }

    /// Override how many characters of the first question become the title
    pub fn with_title_max_chars(mut self, title_max_chars: usize) -> Self {
        self.title_max_chars = title_max_chars;
        self
    }

    /// All conversations, in display order
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Id of the conversation currently displayed and appended to
    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active_id.as_ref()
    }

    /// The conversation currently displayed and appended to
    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_id
            .as_ref()
            .and_then(|id| self.conversations.get(id))
    }

    /// True when at least one conversation has a message
    pub fn has_content(&self) -> bool {
        self.conversations.has_content()
    }

    /// Create an empty conversation and make it active
    ///
    /// Returns the id of the new conversation.
    pub fn create_conversation(&mut self, now_millis: i64) -> ConversationId {
        let id = self.conversations.next_id(now_millis);
        self.conversations.insert(id.clone(), Conversation::new());
        self.active_id = Some(id.clone());
        tracing::debug!("Created conversation {}", id);
        id
    }

    /// Make an existing conversation active
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UnknownConversation` if `id` is not in the store.
    pub fn select_conversation(&mut self, id: &ConversationId) -> Result<()> {
        if !self.conversations.contains(id) {
            return Err(ChatError::UnknownConversation(id.to_string()).into());
        }
        self.active_id = Some(id.clone());
        tracing::debug!("Selected conversation {}", id);
        Ok(())
    }

    /// Append a message to a conversation
    ///
    /// The first message of a conversation also sets its title. Earlier
    /// messages are never modified or reordered.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UnknownConversation` if `id` is not in the store.
    pub fn append_message(
        &mut self,
        id: &ConversationId,
        sender: Sender,
        text: impl Into<String>,
    ) -> Result<()> {
        let title_max_chars = self.title_max_chars;
        let conversation = self
            .conversations
            .get_mut(id)
            .ok_or_else(|| ChatError::UnknownConversation(id.to_string()))?;
        conversation.push(
            Message {
                sender,
                text: text.into(),
            },
            title_max_chars,
        );
        Ok(())
    }

    /// Delete a conversation
    ///
    /// When the deleted conversation was active, the first remaining
    /// conversation becomes active; if none remain, a fresh empty
    /// conversation is created and made active.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UnknownConversation` if `id` is not in the store.
    pub fn delete_conversation(&mut self, id: &ConversationId, now_millis: i64) -> Result<()> {
        if !self.conversations.contains(id) {
            return Err(ChatError::UnknownConversation(id.to_string()).into());
        }
        // Picked while `id` is still present so the replacement never reuses it.
        let replacement = self.conversations.next_id(now_millis);
        self.conversations.remove(id);
        tracing::debug!("Deleted conversation {}", id);

        if self.active_id.as_ref() == Some(id) {
            self.active_id = self.conversations.first_id().cloned();
        }
        if self.active_id.is_none() {
            self.conversations.insert(replacement.clone(), Conversation::new());
            tracing::debug!("Created conversation {}", replacement);
            self.active_id = Some(replacement);
        }
        Ok(())
    }
}
