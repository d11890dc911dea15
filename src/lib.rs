//! gemini-chat - terminal chat client library for the Gemini API
//!
//! This library provides conversation state management for a multi-chat
//! client: the conversation store and the active conversation, persistence,
//! input validation, render reconciliation, and the remote answer client.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `conversation`: Conversation types, the ordered store, and `ChatState` transitions
//! - `storage`: Key-value persistence (SQLite and in-memory) and `StateRepository`
//! - `validation`: Question and API key checks run before any submission
//! - `client`: `AnswerClient` abstraction and the Gemini `generateContent` implementation
//! - `render`: State-to-view projection and minimal terminal updates
//! - `session`: `ChatSession`, which ties state, persistence, and the client together
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use gemini_chat::{ChatSession, Config, GeminiClient};
//! use gemini_chat::storage::{SqliteStore, StateRepository};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let repo = StateRepository::new(SqliteStore::new()?);
//!     let client = GeminiClient::new(&config.api)?;
//!     let mut session = ChatSession::open(&config, repo, client)?;
//!     let outcome = session.submit("What is 6 x 7?", "my-api-key").await?;
//!     println!("{}", outcome.transcript_text());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod render;
pub mod session;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use client::{AnswerClient, GeminiClient};
pub use config::Config;
pub use conversation::{ChatState, ConversationStore};
pub use error::{AnswerError, ChatError, Result};
pub use session::{ChatSession, SubmitOutcome};
