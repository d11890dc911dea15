//! Remote answer client
//!
//! This module contains the answer-client abstraction and the HTTP
//! implementation for the Gemini `generateContent` endpoint.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::AnswerError;
use async_trait::async_trait;

/// Source of answers for user questions
///
/// One call issues one request. Implementations do not retry, time out or
/// cancel; every failure is reported as a single `AnswerError`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use gemini_chat::client::AnswerClient;
/// use gemini_chat::error::AnswerError;
///
/// struct Echo;
///
/// #[async_trait]
/// impl AnswerClient for Echo {
///     async fn ask(&self, question: &str, _api_key: &str, _model: &str)
///         -> Result<String, AnswerError> {
///         Ok(question.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait AnswerClient: Send + Sync {
    /// Send `question` to `model`, authenticating with `api_key`
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::Status` for non-success HTTP statuses,
    /// `AnswerError::Transport` when no response arrived, and
    /// `AnswerError::Format` when the response lacks the answer text.
    async fn ask(&self, question: &str, api_key: &str, model: &str)
        -> Result<String, AnswerError>;
}
