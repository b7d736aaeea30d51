//! Bot token pool with round-robin rotation.

use std::fmt;

use crate::error::{Result, TelegramError};

/// Environment variable holding the bot token list.
pub const TOKEN_ARRAY_ENV: &str = "TOKEN_ARRAY";

/// Ordered bot tokens and the index of the one in use.
///
/// The index always stays within `0..len()`.
#[derive(Clone)]
pub struct TokenPool {
    tokens: Vec<String>,
    index: usize,
}

impl TokenPool {
    /// Create a pool from a token list.
    ///
    /// # Errors
    /// Returns [`TelegramError::NoToken`] for an empty list.
    pub fn new(tokens: Vec<String>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(TelegramError::NoToken);
        }
        Ok(Self { tokens, index: 0 })
    }

    /// Parse a delimited token list.
    ///
    /// Accepts `a,b`, `[a,b]` and `[a,b];`. Entries are trimmed, surrounding
    /// quotes are removed and blank entries skipped.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let raw = raw.strip_prefix('[').unwrap_or(raw);
        let raw = raw
            .strip_suffix("];")
            .or_else(|| raw.strip_suffix(']'))
            .unwrap_or(raw);

        let tokens = raw
            .split(',')
            .map(|t| t.trim().trim_matches(|c| c == '"' || c == '\'').trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(tokens)
    }

    /// Read the pool from `TOKEN_ARRAY`.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(TOKEN_ARRAY_ENV).map_err(|_| TelegramError::NoToken)?;
        Self::parse(&raw)
    }

    /// The token currently in use.
    pub fn current(&self) -> &str {
        &self.tokens[self.index]
    }

    /// Index of the token currently in use.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of tokens in the pool.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; a pool holds at least one token.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Advance to the next token, wrapping after the last one. Returns the
    /// new index.
    pub fn rotate(&mut self) -> usize {
        self.index = (self.index + 1) % self.tokens.len();
        self.index
    }
}

impl fmt::Debug for TokenPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPool")
            .field("len", &self.tokens.len())
            .field("index", &self.index)
            .finish()
    }
}
