//! Persistence for conversation state
//!
//! State is kept as three independent string entries in a key-value store:
//! the JSON-serialized conversation map, the active conversation id, and the
//! last-used API key. `StateRepository` is the only code that knows those
//! keys and encodings.

use crate::conversation::{ChatState, ConversationId, ConversationStore};
use crate::error::{ChatError, Result};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the JSON map of conversation id to conversation
pub const CONVERSATIONS_KEY: &str = "gemini-conversations";

/// Key holding the active conversation id as a plain string
pub const ACTIVE_CHAT_KEY: &str = "gemini-active-chat-id";

/// Key holding the last-used API key as a plain string
pub const API_KEY_KEY: &str = "gemini-api-key";

/// Minimal string key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Reads and writes `ChatState` and the saved API key
pub struct StateRepository {
    store: Box<dyn KeyValueStore>,
}

impl StateRepository {
    /// Wrap a key-value store
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Load the persisted state, repairing the active conversation pointer
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Storage` when the stored conversation map is not
    /// valid JSON. The stored data is left untouched in that case.
    pub fn load(&self, now_millis: i64) -> Result<ChatState> {
        let conversations = match self.store.get(CONVERSATIONS_KEY)? {
            Some(json) => serde_json::from_str::<ConversationStore>(&json).map_err(|e| {
                ChatError::Storage(format!("Stored conversations are corrupt: {}", e))
            })?,
            None => ConversationStore::new(),
        };

        let active_id = self
            .store
            .get(ACTIVE_CHAT_KEY)?
            .filter(|id| !id.is_empty())
            .map(ConversationId::new);

        tracing::debug!(
            "Loaded {} conversations, active={:?}",
            conversations.len(),
            active_id.as_ref().map(|id| id.as_str())
        );

        Ok(ChatState::restore(conversations, active_id, now_millis))
    }

    /// Persist the whole conversation map and the active id
    pub fn save(&self, state: &ChatState) -> Result<()> {
        let json = serde_json::to_string(state.conversations())?;
        self.store.set(CONVERSATIONS_KEY, &json)?;

        match state.active_id() {
            Some(id) => self.store.set(ACTIVE_CHAT_KEY, id.as_str())?,
            None => self.store.remove(ACTIVE_CHAT_KEY)?,
        }

        tracing::debug!("Saved {} conversations", state.conversations().len());
        Ok(())
    }

    /// The API key saved by the last successful key entry, if any
    pub fn load_api_key(&self) -> Result<Option<String>> {
        Ok(self.store.get(API_KEY_KEY)?.filter(|key| !key.is_empty()))
    }

    /// Remember an API key independently of the conversation data
    pub fn save_api_key(&self, api_key: &str) -> Result<()> {
        self.store.set(API_KEY_KEY, api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Sender;

    #[test]
    fn test_round_trip_preserves_ids_titles_and_order() {
        let repo = StateRepository::new(MemoryStore::new());

        let mut state = ChatState::new();
        let first = state.create_conversation(1);
        state
            .append_message(
                &first,
                Sender::User,
                "Hello world, this is a long question exceeding thirty chars",
            )
            .unwrap();
        state.append_message(&first, Sender::Ai, "Hi!").unwrap();
        let second = state.create_conversation(2);
        state.append_message(&second, Sender::User, "Second").unwrap();
        state.select_conversation(&first).unwrap();

        repo.save(&state).unwrap();
        let loaded = repo.load(1_000).unwrap();

        assert_eq!(loaded, state);
        let ids: Vec<&ConversationId> = loaded.conversations().ids().collect();
        assert_eq!(ids, vec![&first, &second]);
        assert_eq!(
            loaded.conversations().get(&first).unwrap().title,
            "Hello world, this is a long qu..."
        );
    }

    #[test]
    fn test_load_from_empty_store_creates_conversation() {
        let repo = StateRepository::new(MemoryStore::new());
        let state = repo.load(5).unwrap();
        assert_eq!(state.active_id().unwrap().as_str(), "chat_5");
    }

    #[test]
    fn test_load_corrupt_json_is_storage_error() {
        let store = MemoryStore::new();
        store.set(CONVERSATIONS_KEY, "{not json").unwrap();
        let repo = StateRepository::new(store);

        let err = repo.load(1).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChatError>(),
            Some(ChatError::Storage(_))
        ));
    }

    #[test]
    fn test_active_id_stored_as_plain_string() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let repo = StateRepository::new(store.clone());
        let mut state = ChatState::new();
        state.create_conversation(123);
        repo.save(&state).unwrap();

        assert_eq!(
            store.get(ACTIVE_CHAT_KEY).unwrap().as_deref(),
            Some("chat_123")
        );
    }

    #[test]
    fn test_api_key_is_independent_of_conversations() {
        let repo = StateRepository::new(MemoryStore::new());
        assert!(repo.load_api_key().unwrap().is_none());

        repo.save_api_key("secret").unwrap();
        repo.save(&ChatState::new()).unwrap();

        assert_eq!(repo.load_api_key().unwrap().as_deref(), Some("secret"));
    }
}
