//! Input validation for question submissions
//!
//! Both the question and the API key are required. Inputs are trimmed before
//! they are checked, and the trimmed values are what gets submitted.

use thiserror::Error;

/// Reasons a submission is rejected before any state changes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Neither the question nor the API key was supplied
    #[error("Please fill in both the question and the API key.")]
    MissingBoth,

    /// The question is empty after trimming
    #[error("Please fill in the question.")]
    MissingQuestion,

    /// The API key is empty after trimming
    #[error("Please fill in the API key.")]
    MissingApiKey,

    /// The question is longer than the configured maximum
    #[error("The question exceeds {max} characters.")]
    QuestionTooLong {
        /// Length of the submitted question in characters
        len: usize,
        /// Configured maximum length in characters
        max: usize,
    },
}

/// A validated, trimmed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Question text with surrounding whitespace removed
    pub question: String,
    /// API key with surrounding whitespace removed
    pub api_key: String,
}

/// Validate the two required fields of a submission
///
/// Validation runs before any conversation is created, so the
/// `MissingBoth` message is reachable.
///
/// # Examples
///
/// ```
/// use gemini_chat::validation::{validate_submission, ValidationError};
///
/// let submission = validate_submission("  hi ", " key ", 2000).unwrap();
/// assert_eq!(submission.question, "hi");
/// assert_eq!(submission.api_key, "key");
///
/// assert_eq!(
///     validate_submission("", "", 2000),
///     Err(ValidationError::MissingBoth)
/// );
/// ```
pub fn validate_submission(
    question: &str,
    api_key: &str,
    max_question_length: usize,
) -> Result<Submission, ValidationError> {
    let question = question.trim();
    let api_key = api_key.trim();

    match (question.is_empty(), api_key.is_empty()) {
        (true, true) => return Err(ValidationError::MissingBoth),
        (true, false) => return Err(ValidationError::MissingQuestion),
        (false, true) => return Err(ValidationError::MissingApiKey),
        (false, false) => {}
    }

    let len = question.chars().count();
    if len > max_question_length {
        return Err(ValidationError::QuestionTooLong {
            len,
            max: max_question_length,
        });
    }

    Ok(Submission {
        question: question.to_string(),
        api_key: api_key.to_string(),
    })
}
