//! Claude Messages API client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TelegramError};
use crate::history::Turn;

/// Environment variable for the Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the model.
pub const ANTHROPIC_MODEL_ENV: &str = "ANTHROPIC_MODEL";

/// Environment variable overriding the API base URL.
pub const ANTHROPIC_BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

/// Environment variable overriding the system prompt.
pub const SYSTEM_PROMPT_ENV: &str = "SYSTEM_PROMPT";

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant on Telegram. Be concise and direct in your responses.";

const API_VERSION: &str = "2023-06-01";

/// Produces a reply for a conversation.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Complete the conversation. `history` ends with the newest user turn.
    async fn complete(&self, history: &[Turn]) -> Result<String>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn complete(&self, history: &[Turn]) -> Result<String> {
        (**self).complete(history).await
    }
}

/// Model settings for Claude requests.
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub base_url: String,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClaudeConfig {
    /// Defaults overridden by `ANTHROPIC_MODEL`, `SYSTEM_PROMPT` and
    /// `ANTHROPIC_BASE_URL` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: env_or(ANTHROPIC_MODEL_ENV, defaults.model),
            max_tokens: defaults.max_tokens,
            system_prompt: env_or(SYSTEM_PROMPT_ENV, defaults.system_prompt),
            base_url: env_or(ANTHROPIC_BASE_URL_ENV, defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Turn],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block.
    fn into_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
    }
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct ClaudeClient {
    client: reqwest::Client,
    api_key: String,
    config: ClaudeConfig,
}

impl ClaudeClient {
    pub fn new(api_key: impl Into<String>, config: ClaudeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// Create a client keyed by `ANTHROPIC_API_KEY`.
    pub fn from_env(config: ClaudeConfig) -> Result<Self> {
        let api_key = std::env::var(ANTHROPIC_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TelegramError::NoApiKey)?;
        Ok(Self::new(api_key, config))
    }

    pub fn config(&self) -> &ClaudeConfig {
        &self.config
    }
}

#[async_trait]
impl ChatBackend for ClaudeClient {
    async fn complete(&self, history: &[Turn]) -> Result<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: &self.config.system_prompt,
            messages: history,
        };

        debug!(model = %self.config.model, turns = history.len(), "Sending Claude request");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| TelegramError::BackendError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Claude API error");
            return Err(TelegramError::BackendError(format!(
                "API error {}: {}",
                status, text
            )));
        }

        let response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| TelegramError::BackendError(format!("Failed to parse response: {}", e)))?;

        response
            .into_text()
            .ok_or_else(|| TelegramError::BackendError("Response had no text content".into()))
    }
}
