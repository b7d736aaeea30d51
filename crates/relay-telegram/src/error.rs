//! Error types for the Telegram bridge.

use thiserror::Error;

/// Errors that can occur in the Telegram bridge.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// No bot token configured.
    #[error("No Telegram bot tokens configured. Set TOKEN_ARRAY environment variable.")]
    NoToken,

    /// Anthropic API key not set.
    #[error("ANTHROPIC_API_KEY not set")]
    NoApiKey,

    /// Command name that cannot be matched.
    #[error("Invalid command name: {0}")]
    InvalidCommand(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Telegram answered with `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    ApiError {
        /// Telegram `error_code`.
        code: i64,
        /// Telegram `description`.
        description: String,
    },

    /// Every bot token was rate limited in one poll.
    #[error("All {0} bot tokens are rate limited")]
    RateLimited(usize),

    /// Claude API error.
    #[error("Claude API error: {0}")]
    BackendError(String),
}

/// Result type for Telegram bridge operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs carry the bot token.
        TelegramError::HttpError(e.without_url().to_string())
    }
}
