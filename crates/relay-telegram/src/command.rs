//! Chat command matching and reply sizing.

use regex::Regex;

use crate::error::{Result, TelegramError};

/// Default command that triggers a reply.
pub const DEFAULT_COMMAND: &str = "claude";

/// Telegram's limit on message length, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

const ELLIPSIS: &str = "...";

/// Matches `/<command>` or `/<command>@botname` followed by a payload.
#[derive(Debug, Clone)]
pub struct CommandParser {
    pattern: Regex,
}

impl CommandParser {
    pub fn new(command: &str) -> Result<Self> {
        let command = command.trim().trim_start_matches('/');
        if command.is_empty() || command.chars().any(char::is_whitespace) {
            return Err(TelegramError::InvalidCommand(command.to_string()));
        }

        let pattern = format!(r"^/{}(?:@\w+)?\s+([\s\S]+)", regex::escape(command));
        let pattern =
            Regex::new(&pattern).map_err(|e| TelegramError::InvalidCommand(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Extract the trimmed payload, or `None` when the text is not the
    /// command or carries nothing after it.
    pub fn parse<'a>(&self, text: &'a str) -> Option<&'a str> {
        let payload = self.pattern.captures(text)?.get(1)?.as_str().trim();
        (!payload.is_empty()).then_some(payload)
    }
}

/// Cut a reply to `max_units` UTF-16 code units, marking the cut with `...`.
///
/// Telegram measures text in UTF-16, so characters outside the Basic
/// Multilingual Plane count twice. Cuts fall between characters, never
/// inside a surrogate pair.
pub fn truncate_message(text: &str, max_units: usize) -> String {
    if text.encode_utf16().count() <= max_units {
        return text.to_string();
    }

    let budget = max_units.saturating_sub(ELLIPSIS.len());
    let mut used = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        used += c.len_utf16();
        if used > budget {
            break;
        }
        truncated.push(c);
    }
    truncated.push_str(ELLIPSIS);
    truncated
}
