//! Insertion-ordered conversation map
//!
//! The store serializes as a JSON object keyed by conversation id. Key order
//! in the JSON is the insertion order, which is also the display order of the
//! conversation list.

use super::{Conversation, ConversationId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from conversation id to conversation, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationStore {
    entries: IndexMap<ConversationId, Conversation>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the store holds no conversations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `id` names a conversation in the store
    pub fn contains(&self, id: &ConversationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Look up a conversation by id
    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.entries.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.entries.get_mut(id)
    }

    /// Insert a conversation; an existing id keeps its position
    pub fn insert(&mut self, id: ConversationId, conversation: Conversation) {
        self.entries.insert(id, conversation);
    }

    /// Remove a conversation, returning it if it was present
    ///
    /// The remaining conversations keep their relative order.
    pub fn remove(&mut self, id: &ConversationId) -> Option<Conversation> {
        self.entries.shift_remove(id)
    }

    /// Id of the oldest conversation still in the store
    pub fn first_id(&self) -> Option<&ConversationId> {
        self.entries.first().map(|(id, _)| id)
    }

    /// Iterate conversations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&ConversationId, &Conversation)> {
        self.entries.iter()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &ConversationId> {
        self.entries.keys()
    }

    /// True when at least one conversation has a message
    pub fn has_content(&self) -> bool {
        self.entries.values().any(|c| !c.is_empty())
    }

    /// Find a conversation id by exact match or unique prefix
    ///
    /// Returns `None` when nothing matches or the prefix is ambiguous.
    pub fn resolve(&self, id_or_prefix: &str) -> Option<&ConversationId> {
        if let Some((id, _)) = self.entries.get_key_value(id_or_prefix) {
            return Some(id);
        }
        let mut matches = self
            .entries
            .keys()
            .filter(|id| id.as_str().starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Some(id),
            _ => None,
        }
    }

    /// Generate an id derived from `now_millis` that is not yet in use
    ///
    /// Collisions (two conversations created in the same millisecond) are
    /// resolved by moving forward one millisecond at a time.
    pub fn next_id(&self, now_millis: i64) -> ConversationId {
        let mut millis = now_millis;
        loop {
            let id = ConversationId::from_millis(millis);
            if !self.contains(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;

    fn conversation_with(texts: &[&str]) -> Conversation {
        let mut conversation = Conversation::new();
        for text in texts {
            conversation.push(Message::user(*text), 30);
        }
        conversation
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut store = ConversationStore::new();
        store.insert("chat_3".into(), Conversation::new());
        store.insert("chat_1".into(), Conversation::new());
        store.insert("chat_2".into(), Conversation::new());

        let ids: Vec<&str> = store.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["chat_3", "chat_1", "chat_2"]);
        assert_eq!(store.first_id().unwrap().as_str(), "chat_3");
    }

    #[test]
    fn test_insert_existing_replaces_in_place() {
        let mut store = ConversationStore::new();
        store.insert("a".into(), Conversation::new());
        store.insert("b".into(), Conversation::new());
        store.insert("a".into(), conversation_with(&["x"]));

        let ids: Vec<&str> = store.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.get(&"a".into()).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let mut store = ConversationStore::new();
        store.insert("a".into(), Conversation::new());
        store.insert("b".into(), Conversation::new());
        store.insert("c".into(), Conversation::new());
        store.insert("d".into(), Conversation::new());

        store.remove(&"b".into());

        let ids: Vec<&str> = store.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove() {
        let mut store = ConversationStore::new();
        store.insert("a".into(), Conversation::new());
        assert!(store.remove(&"a".into()).is_some());
        assert!(store.remove(&"a".into()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_has_content() {
        let mut store = ConversationStore::new();
        store.insert("a".into(), Conversation::new());
        assert!(!store.has_content());
        store.insert("b".into(), conversation_with(&["hi"]));
        assert!(store.has_content());
    }

    #[test]
    fn test_next_id_skips_taken_millis() {
        let mut store = ConversationStore::new();
        store.insert(ConversationId::from_millis(100), Conversation::new());
        store.insert(ConversationId::from_millis(101), Conversation::new());

        assert_eq!(store.next_id(100), ConversationId::from_millis(102));
        assert_eq!(store.next_id(500), ConversationId::from_millis(500));
    }

    #[test]
    fn test_resolve_by_prefix() {
        let mut store = ConversationStore::new();
        store.insert("chat_1700".into(), Conversation::new());
        store.insert("chat_1800".into(), Conversation::new());

        assert_eq!(store.resolve("chat_17").unwrap().as_str(), "chat_1700");
        assert_eq!(store.resolve("chat_1800").unwrap().as_str(), "chat_1800");
        assert!(store.resolve("chat_1").is_none());
        assert!(store.resolve("nope").is_none());
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let mut store = ConversationStore::new();
        store.insert("chat_9".into(), conversation_with(&["nine"]));
        store.insert("chat_10".into(), conversation_with(&["ten"]));

        let json = serde_json::to_string(&store).unwrap();
        assert!(json.find("chat_9").unwrap() < json.find("chat_10").unwrap());

        let parsed: ConversationStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }

    #[test]
    fn test_reads_browser_shaped_json() {
        let json = r#"{
            "chat_1": {"title": "Hi", "messages": [
                {"sender": "user", "text": "Hi"},
                {"sender": "ai", "text": "Hello!"}
            ]},
            "chat_2": {"title": "New chat", "messages": []}
        }"#;
        let store: ConversationStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.len(), 2);
        let first = store.get(&"chat_1".into()).unwrap();
        assert_eq!(first.messages()[1], Message::ai("Hello!"));
    }
}
