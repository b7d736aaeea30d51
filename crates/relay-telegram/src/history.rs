//! Per-chat conversation history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default number of turns kept per chat.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// In-memory histories keyed by chat ID.
///
/// Each history holds at most `max_turns` entries. The oldest turns are
/// dropped first. Nothing is persisted; a restart starts every chat fresh.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    conversations: HashMap<i64, Vec<Turn>>,
    max_turns: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl ConversationStore {
    pub fn new(max_turns: usize) -> Self {
        Self {
            conversations: HashMap::new(),
            max_turns: max_turns.max(1),
        }
    }

    /// Append a turn and evict the oldest ones beyond the limit.
    pub fn push(&mut self, chat_id: i64, turn: Turn) {
        let history = self.conversations.entry(chat_id).or_default();
        history.push(turn);
        if history.len() > self.max_turns {
            let excess = history.len() - self.max_turns;
            history.drain(..excess);
        }
    }

    /// History for a chat, oldest first. Empty for unknown chats.
    pub fn history(&self, chat_id: i64) -> &[Turn] {
        self.conversations
            .get(&chat_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of chats with history.
    pub fn chat_count(&self) -> usize {
        self.conversations.len()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}
