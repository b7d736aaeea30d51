//! Bridge configuration.

use std::time::Duration;

use crate::command::{DEFAULT_COMMAND, MAX_MESSAGE_LEN};
use crate::history::DEFAULT_MAX_TURNS;

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Long-poll timeout sent to `getUpdates`, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u32 = 30;

/// Settings for the polling loop and the Telegram client.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Command name without the leading slash.
    pub command: String,
    /// Bot API base URL.
    pub api_url: String,
    /// Long-poll timeout passed to Telegram.
    pub poll_timeout_secs: u32,
    /// Client-side HTTP timeout. Must exceed the long-poll timeout.
    pub request_timeout: Duration,
    /// Pause after a failed poll.
    pub retry_delay: Duration,
    /// Turns kept per chat.
    pub max_history: usize,
    /// Longest message sent to Telegram, in UTF-16 code units.
    pub max_message_len: usize,
    /// `parse_mode` for outgoing messages.
    pub parse_mode: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            request_timeout: Duration::from_secs(u64::from(DEFAULT_POLL_TIMEOUT_SECS) + 5),
            retry_delay: Duration::from_secs(5),
            max_history: DEFAULT_MAX_TURNS,
            max_message_len: MAX_MESSAGE_LEN,
            parse_mode: Some("Markdown".to_string()),
        }
    }
}

impl BridgeConfig {
    /// Set the long-poll timeout and keep the HTTP timeout five seconds
    /// above it.
    pub fn with_poll_timeout(mut self, secs: u32) -> Self {
        self.poll_timeout_secs = secs;
        self.request_timeout = Duration::from_secs(u64::from(secs) + 5);
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}
