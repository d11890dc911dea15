//! Gemini `generateContent` client
//!
//! Builds one POST per question and extracts
//! `candidates[0].content.parts[0].text` from the response through typed
//! response structs. Anything that does not fit that shape is a format error.

use super::AnswerClient;
use crate::config::ApiConfig;
use crate::error::{AnswerError, ChatError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Message used when a 2xx response has no answer text
pub const UNEXPECTED_FORMAT_MESSAGE: &str =
    "The API did not return a response in the expected format.";

/// HTTP client for the Gemini API
///
/// # Examples
///
/// ```
/// use gemini_chat::client::GeminiClient;
/// use gemini_chat::config::ApiConfig;
///
/// let client = GeminiClient::new(&ApiConfig::default()).unwrap();
/// assert_eq!(
///     client.endpoint("gemini-2.0-flash"),
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
/// );
/// ```
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

/// Request body: `{"contents":[{"parts":[{"text": ...}]}]}`
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Successful response body (only the fields that are read)
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Error response body: `{"error":{"message": ...}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl GenerateContentResponse {
    fn into_answer(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

impl GeminiClient {
    /// Create a client for the configured API base URL
    ///
    /// No request timeout is configured; a request lasts as long as the
    /// transport keeps it alive.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gemini-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ChatError::Http)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Initialized Gemini client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// URL of the `generateContent` endpoint for `model`, without the key
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

/// Extract the user-facing message from a non-success response body
fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()))
}

#[async_trait]
impl AnswerClient for GeminiClient {
    async fn ask(
        &self,
        question: &str,
        api_key: &str,
        model: &str,
    ) -> std::result::Result<String, AnswerError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: question }],
            }],
        };

        tracing::debug!(
            "Sending generateContent request: model={}, {} chars",
            model,
            question.chars().count()
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key.
                let e = e.without_url();
                tracing::warn!("generateContent request failed: {}", e);
                AnswerError::Transport(e.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::warn!("Failed to read generateContent response: {}", e);
            AnswerError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let message = status_message(status, &text);
            tracing::error!("Gemini returned error {}: {}", status, message);
            return Err(AnswerError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to parse generateContent response: {}", e);
            AnswerError::Format(format!("Failed to parse response: {}", e))
        })?;

        parsed.into_answer().ok_or_else(|| {
            tracing::error!("generateContent response had no candidate text");
            AnswerError::Format(UNEXPECTED_FORMAT_MESSAGE.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<String> {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .into_answer()
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_answer_extracted_from_first_candidate_part() {
        let json = r#"{"candidates":[
            {"content":{"parts":[{"text":"first"},{"text":"second"}]}},
            {"content":{"parts":[{"text":"other"}]}}
        ]}"#;
        assert_eq!(parse(json).as_deref(), Some("first"));
    }

    #[test]
    fn test_missing_path_segments_yield_none() {
        assert!(parse("{}").is_none());
        assert!(parse(r#"{"candidates":[]}"#).is_none());
        assert!(parse(r#"{"candidates":[{}]}"#).is_none());
        assert!(parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#).is_none());
        assert!(parse(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).is_none());
        assert!(parse(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#).is_none());
    }

    #[test]
    fn test_status_message_prefers_error_message() {
        let status = reqwest::StatusCode::TOO_MANY_REQUESTS;
        assert_eq!(
            status_message(status, r#"{"error":{"message":"rate limited"}}"#),
            "rate limited"
        );
        assert_eq!(status_message(status, "not json"), "HTTP error: 429");
        assert_eq!(status_message(status, r#"{"error":{}}"#), "HTTP error: 429");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:9999/".to_string(),
            ..ApiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("m"),
            "http://localhost:9999/v1beta/models/m:generateContent"
        );
    }
}
