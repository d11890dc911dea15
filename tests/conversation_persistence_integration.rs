use async_trait::async_trait;
use gemini_chat::client::AnswerClient;
use gemini_chat::config::Config;
use gemini_chat::conversation::Sender;
use gemini_chat::error::AnswerError;
use gemini_chat::session::ChatSession;
use gemini_chat::storage::{KeyValueStore, ACTIVE_CHAT_KEY, CONVERSATIONS_KEY};

mod common;

/// Answer client that echoes the question back
#[derive(Clone)]
struct EchoClient;

#[async_trait]
impl AnswerClient for EchoClient {
    async fn ask(
        &self,
        question: &str,
        _api_key: &str,
        _model: &str,
    ) -> Result<String, AnswerError> {
        Ok(format!("echo: {}", question))
    }
}

#[tokio::test]
async fn test_conversations_survive_reopen() {
    let (store, tmp) = common::create_temp_storage();
    let db_path = store.path().to_path_buf();
    drop(store);

    let config = Config::default();
    let (first_id, second_id) = {
        let mut session =
            ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
        session.submit("first question", "key").await.unwrap();
        let first_id = session.state().active_id().unwrap().clone();

        session.new_conversation().unwrap();
        session.submit("second question", "key").await.unwrap();
        let second_id = session.state().active_id().unwrap().clone();
        (first_id, second_id)
    };

    let session =
        ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
    let state = session.state();

    assert_eq!(state.active_id(), Some(&second_id));
    let ids: Vec<_> = state.conversations().ids().cloned().collect();
    assert_eq!(ids, vec![first_id.clone(), second_id.clone()]);

    let first = state.conversations().get(&first_id).unwrap();
    assert_eq!(first.title, "first question");
    assert_eq!(first.messages()[1].sender, Sender::Ai);
    assert_eq!(first.messages()[1].text, "echo: first question");

    drop(tmp);
}

#[tokio::test]
async fn test_selection_and_api_key_survive_reopen() {
    let (store, _tmp) = common::create_temp_storage();
    let db_path = store.path().to_path_buf();

    let config = Config::default();
    let first_id = {
        let mut session =
            ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
        session.submit("keep", "key").await.unwrap();
        let first_id = session.state().active_id().unwrap().clone();
        session.new_conversation().unwrap();
        session.select_conversation(&first_id).unwrap();
        session.remember_api_key("  my-key  ").unwrap();
        first_id
    };

    let session =
        ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
    assert_eq!(session.state().active_id(), Some(&first_id));
    assert_eq!(session.saved_api_key().unwrap(), Some("my-key".to_string()));
}

#[tokio::test]
async fn test_stored_format_uses_expected_keys() {
    let (store, _tmp) = common::create_temp_storage();
    let db_path = store.path().to_path_buf();

    let config = Config::default();
    let mut session =
        ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
    session.submit("hello", "key").await.unwrap();
    let active = session.state().active_id().unwrap().clone();

    assert_eq!(
        store.get(ACTIVE_CHAT_KEY).unwrap(),
        Some(active.as_str().to_string())
    );

    let json = store.get(CONVERSATIONS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entry = &value[active.as_str()];
    assert_eq!(entry["title"], "hello");
    assert_eq!(entry["messages"][0]["sender"], "user");
    assert_eq!(entry["messages"][0]["text"], "hello");
    assert_eq!(entry["messages"][1]["sender"], "ai");
}

#[tokio::test]
async fn test_dangling_active_id_is_repaired_on_open() {
    let (store, _tmp) = common::create_temp_storage();
    let db_path = store.path().to_path_buf();

    let config = Config::default();
    let first_id = {
        let mut session =
            ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
        session.submit("only", "key").await.unwrap();
        session.state().active_id().unwrap().clone()
    };

    store.set(ACTIVE_CHAT_KEY, "chat_does_not_exist").unwrap();

    let session =
        ChatSession::open(&config, common::open_repository(&db_path), EchoClient).unwrap();
    assert_eq!(session.state().active_id(), Some(&first_id));
    assert_eq!(
        store.get(ACTIVE_CHAT_KEY).unwrap(),
        Some(first_id.as_str().to_string())
    );
}

#[tokio::test]
async fn test_corrupt_store_is_reported_not_overwritten() {
    let (store, _tmp) = common::create_temp_storage();
    let db_path = store.path().to_path_buf();
    store.set(CONVERSATIONS_KEY, "{not json").unwrap();

    let result = ChatSession::open(
        &Config::default(),
        common::open_repository(&db_path),
        EchoClient,
    );
    let err = result.err().unwrap();
    assert!(err.to_string().contains("Stored conversations are corrupt"));
    assert_eq!(
        store.get(CONVERSATIONS_KEY).unwrap(),
        Some("{not json".to_string())
    );
}
