//! Error types for gemini-chat
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::validation::ValidationError;

/// Main error type for gemini-chat operations
///
/// Covers configuration loading, input validation, conversation state
/// transitions, persistence, and the interactive terminal.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required field was missing or invalid; the submission was blocked
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A conversation id that is not present in the store
    #[error("Unknown conversation: {0}")]
    UnknownConversation(String),

    /// Persistence errors (database operations, corrupt stored state)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Interactive line editor errors
    #[error("Readline error: {0}")]
    Readline(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single request to the generative-language API
///
/// Every variant renders as one human-readable message suitable for showing
/// inline and for recording in the transcript.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    /// The API answered with a non-success HTTP status
    #[error("{message}")]
    Status {
        /// HTTP status code returned by the API
        status: u16,
        /// `error.message` from the body, or a generic status message
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset)
    #[error("{0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("{0}")]
    Format(String),
}

impl AnswerError {
    /// True for failures caused by the response body rather than the transport
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Result type alias for gemini-chat operations
///
/// Uses `anyhow::Error` so that `ChatError` values can carry context and
/// still be recovered with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ChatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_validation_error_display_is_the_user_message() {
        let error: ChatError = ValidationError::MissingApiKey.into();
        assert_eq!(error.to_string(), "Please fill in the API key.");
    }

    #[test]
    fn test_unknown_conversation_display() {
        let error = ChatError::UnknownConversation("chat_1".to_string());
        assert_eq!(error.to_string(), "Unknown conversation: chat_1");
    }

    #[test]
    fn test_storage_error_display() {
        let error = ChatError::Storage("database connection failed".to_string());
        assert_eq!(
            error.to_string(),
            "Storage error: database connection failed"
        );
    }

    #[test]
    fn test_answer_status_error_uses_message() {
        let error = AnswerError::Status {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(error.to_string(), "rate limited");
        assert!(!error.is_format());
    }

    #[test]
    fn test_answer_format_error() {
        let error = AnswerError::Format("bad shape".to_string());
        assert!(error.is_format());
        assert_eq!(error.to_string(), "bad shape");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ChatError = io_error.into();
        assert!(matches!(error, ChatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ChatError = json_error.into();
        assert!(matches!(error, ChatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ChatError = yaml_error.into();
        assert!(matches!(error, ChatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatError>();
        assert_send_sync::<AnswerError>();
    }
}
