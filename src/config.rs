//! Configuration management for gemini-chat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Chat behavior settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the generative-language API
    ///
    /// Overridable so tests can point the client at a mock server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used when none is given on the command line
    #[serde(default = "default_model")]
    pub model: String,

    /// Models that may be selected
    #[serde(default = "default_available_models")]
    pub available_models: Vec<String>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_available_models() -> Vec<String> {
    vec![
        "gemini-2.0-flash".to_string(),
        "gemini-1.5-flash".to_string(),
        "gemini-1.5-pro".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            available_models: default_available_models(),
        }
    }
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Longest accepted question, in characters
    #[serde(default = "default_max_question_length")]
    pub max_question_length: usize,

    /// Characters of the first question kept in a conversation title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

fn default_max_question_length() -> usize {
    2000
}

fn default_title_max_chars() -> usize {
    crate::conversation::DEFAULT_TITLE_MAX_CHARS
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_question_length: default_max_question_length(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; the platform data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("GEMINI_CHAT_MODEL") {
            tracing::debug!(model = %model, "Env override: GEMINI_CHAT_MODEL");
            self.api.model = model;
        }

        if let Ok(base_url) = std::env::var("GEMINI_CHAT_API_BASE") {
            tracing::debug!(base_url = %base_url, "Env override: GEMINI_CHAT_API_BASE");
            self.api.base_url = base_url;
        }

        if let Ok(max_len) = std::env::var("GEMINI_CHAT_MAX_QUESTION_LENGTH") {
            if let Ok(value) = max_len.parse() {
                self.chat.max_question_length = value;
            } else {
                tracing::warn!("Invalid GEMINI_CHAT_MAX_QUESTION_LENGTH: {}", max_len);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` describing the first failing check
    pub fn validate(&self) -> Result<()> {
        if self.api.available_models.is_empty() {
            return Err(ChatError::Config(
                "api.available_models must list at least one model".to_string(),
            )
            .into());
        }

        self.validate_model(&self.api.model)?;

        url::Url::parse(&self.api.base_url).map_err(|e| {
            ChatError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;

        if self.chat.max_question_length == 0 {
            return Err(ChatError::Config(
                "chat.max_question_length must be greater than 0".to_string(),
            )
            .into());
        }

        if self.chat.title_max_chars == 0 {
            return Err(ChatError::Config(
                "chat.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Check that `model` is one of the selectable models
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` for empty or unlisted models
    pub fn validate_model(&self, model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(ChatError::Config("Model cannot be empty".to_string()).into());
        }
        if !self.api.available_models.iter().any(|m| m == model) {
            return Err(ChatError::Config(format!(
                "Unknown model: {}. Must be one of: {}",
                model,
                self.api.available_models.join(", ")
            ))
            .into());
        }
        Ok(())
    }
}
