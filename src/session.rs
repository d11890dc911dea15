//! Chat session controller
//!
//! `ChatSession` owns the application state, the repository it is persisted
//! to, and the answer client. Every state transition is followed by a save,
//! so the stored state always matches what the user last saw.
//!
//! A transition is applied to a copy of the state, saved, and only then
//! becomes current; when the save fails the session keeps the previous
//! state and the error is returned.
//!
//! A submission is split in two phases so the caller can render the user's
//! message before waiting on the network: [`ChatSession::begin_submit`]
//! validates and records the question, [`ChatSession::finish_submit`]
//! records the answer or the error. [`ChatSession::submit`] runs both.

use crate::client::AnswerClient;
use crate::config::Config;
use crate::conversation::{ChatState, ConversationId, Sender};
use crate::error::{AnswerError, ChatError, Result};
use crate::storage::StateRepository;
use crate::validation::validate_submission;

/// A question that has been recorded and is waiting for its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    /// Conversation the answer will be appended to
    pub conversation_id: ConversationId,
    /// Trimmed question text
    pub question: String,
    /// Trimmed API key
    pub api_key: String,
    /// Model the question is sent to
    pub model: String,
}

/// Result of a completed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The API answered; the text was appended as an AI message
    Answered(String),
    /// The request failed; `message` was shown and recorded
    Failed {
        /// Underlying failure
        error: AnswerError,
        /// Inline message, e.g. `An error occurred: rate limited`
        message: String,
    },
}

impl SubmitOutcome {
    /// Text of the AI message that was appended for this outcome
    pub fn transcript_text(&self) -> String {
        match self {
            Self::Answered(text) => text.clone(),
            Self::Failed { error, .. } => failure_transcript_text(error),
        }
    }
}

/// Inline message for a failed request
pub fn failure_message(error: &AnswerError) -> String {
    format!("An error occurred: {}", error)
}

/// AI-authored transcript entry recorded for a failed request
pub fn failure_transcript_text(error: &AnswerError) -> String {
    format!("Sorry, an error occurred: {}", error)
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Application controller for one user's conversations
pub struct ChatSession<C: AnswerClient> {
    state: ChatState,
    repo: StateRepository,
    client: C,
    model: String,
    max_question_length: usize,
}

impl<C: AnswerClient> ChatSession<C> {
    /// Load persisted state and start a session
    ///
    /// The repaired state is saved immediately, so a freshly created
    /// conversation or a corrected active id is persisted.
    ///
    /// # Errors
    ///
    /// Returns error if the stored state cannot be read or written
    pub fn open(config: &Config, repo: StateRepository, client: C) -> Result<Self> {
        let state = repo
            .load(now_millis())?
            .with_title_max_chars(config.chat.title_max_chars);
        repo.save(&state)?;

        tracing::info!(
            "Opened chat session: {} conversations, model={}",
            state.conversations().len(),
            config.api.model
        );

        Ok(Self {
            state,
            repo,
            client,
            model: config.api.model.clone(),
            max_question_length: config.chat.max_question_length,
        })
    }

    /// Current state, for rendering
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Model questions are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Change the model used for subsequent questions
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        tracing::info!("Switched model to {}", self.model);
    }

    /// Longest accepted question, in characters
    pub fn max_question_length(&self) -> usize {
        self.max_question_length
    }

    /// Last API key the user entered, if any
    pub fn saved_api_key(&self) -> Result<Option<String>> {
        self.repo.load_api_key()
    }

    /// Remember an API key for later sessions
    pub fn remember_api_key(&self, api_key: &str) -> Result<()> {
        self.repo.save_api_key(api_key.trim())
    }

    /// Create an empty conversation, make it active, and persist
    pub fn new_conversation(&mut self) -> Result<ConversationId> {
        let mut next = self.state.clone();
        let id = next.create_conversation(now_millis());
        self.commit(next)?;
        Ok(id)
    }

    /// Make `id` the active conversation and persist
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UnknownConversation` for ids not in the store
    pub fn select_conversation(&mut self, id: &ConversationId) -> Result<()> {
        let mut next = self.state.clone();
        next.select_conversation(id)?;
        self.commit(next)
    }

    /// Resolve an id or unique id prefix to a stored conversation
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UnknownConversation` when nothing (or more than
    /// one conversation) matches
    pub fn resolve(&self, id_or_prefix: &str) -> Result<ConversationId> {
        self.state
            .conversations()
            .resolve(id_or_prefix)
            .cloned()
            .ok_or_else(|| ChatError::UnknownConversation(id_or_prefix.to_string()).into())
    }

    /// Delete the active conversation and persist
    ///
    /// The first remaining conversation becomes active; when none remain a
    /// fresh empty one is created. Returns the id of the deleted conversation.
    pub fn delete_active(&mut self) -> Result<ConversationId> {
        let id = self
            .state
            .active_id()
            .cloned()
            .ok_or_else(|| ChatError::UnknownConversation("<none>".to_string()))?;
        let mut next = self.state.clone();
        next.delete_conversation(&id, now_millis())?;
        self.commit(next)?;
        tracing::info!("Deleted conversation {}", id);
        Ok(id)
    }

    /// Validate a submission and record the question in the active conversation
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Validation` when a required field is missing; the
    /// state is not modified in that case.
    pub fn begin_submit(&mut self, question: &str, api_key: &str) -> Result<PendingQuestion> {
        let submission = validate_submission(question, api_key, self.max_question_length)
            .map_err(ChatError::Validation)?;

        let mut next = self.state.clone();
        let conversation_id = match next.active_id() {
            Some(id) => id.clone(),
            None => next.create_conversation(now_millis()),
        };

        next.append_message(&conversation_id, Sender::User, submission.question.clone())?;
        self.commit(next)?;

        Ok(PendingQuestion {
            conversation_id,
            question: submission.question,
            api_key: submission.api_key,
            model: self.model.clone(),
        })
    }

    /// Send a recorded question to the API
    pub async fn request(
        &self,
        pending: &PendingQuestion,
    ) -> std::result::Result<String, AnswerError> {
        self.client
            .ask(&pending.question, &pending.api_key, &pending.model)
            .await
    }

    /// Record the answer (or the failure) for a pending question
    ///
    /// The AI message goes to the conversation the question was asked in,
    /// even if another conversation became active meanwhile.
    pub fn finish_submit(
        &mut self,
        pending: &PendingQuestion,
        answer: std::result::Result<String, AnswerError>,
    ) -> Result<SubmitOutcome> {
        let outcome = match answer {
            Ok(text) => SubmitOutcome::Answered(text),
            Err(error) => {
                tracing::warn!("Request failed: {}", error);
                SubmitOutcome::Failed {
                    message: failure_message(&error),
                    error,
                }
            }
        };

        if self.state.conversations().contains(&pending.conversation_id) {
            let mut next = self.state.clone();
            next.append_message(
                &pending.conversation_id,
                Sender::Ai,
                outcome.transcript_text(),
            )?;
            self.commit(next)?;
        } else {
            tracing::warn!(
                "Conversation {} was deleted before its answer arrived",
                pending.conversation_id
            );
        }

        Ok(outcome)
    }

    /// Validate, record, send, and record the answer in one call
    ///
    /// Taking `&mut self` means only one request per session can be in
    /// flight.
    pub async fn submit(&mut self, question: &str, api_key: &str) -> Result<SubmitOutcome> {
        let pending = self.begin_submit(question, api_key)?;
        let answer = self.request(&pending).await;
        self.finish_submit(&pending, answer)
    }

    /// Save `next` and only then make it the current state
    fn commit(&mut self, next: ChatState) -> Result<()> {
        self.repo.save(&next)?;
        self.state = next;
        Ok(())
    }
}
