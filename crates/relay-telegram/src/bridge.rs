//! Long-poll loop relaying chat commands to Claude.

use tracing::{debug, error, info, warn};

use crate::api::{TelegramApi, Update};
use crate::claude::ChatBackend;
use crate::command::{truncate_message, CommandParser};
use crate::config::BridgeConfig;
use crate::error::{Result, TelegramError};
use crate::history::{ConversationStore, Turn};
use crate::tokens::TokenPool;

/// Sent when Claude produced no reply.
pub const APOLOGY: &str = "Sorry, I could not generate a response.";

/// What happened to a single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Not a command message.
    Ignored,
    /// A reply was produced and sent.
    Replied,
    /// No reply was produced; the apology was sent.
    Apologized,
}

/// Polls Telegram, answers commands and keeps per-chat history.
pub struct Bridge<A, B> {
    api: A,
    backend: B,
    tokens: TokenPool,
    conversations: ConversationStore,
    parser: CommandParser,
    config: BridgeConfig,
}

impl<A: TelegramApi, B: ChatBackend> Bridge<A, B> {
    pub fn new(api: A, backend: B, tokens: TokenPool, config: BridgeConfig) -> Result<Self> {
        let parser = CommandParser::new(&config.command)?;
        Ok(Self {
            api,
            backend,
            tokens,
            conversations: ConversationStore::new(config.max_history),
            parser,
            config,
        })
    }

    pub fn tokens(&self) -> &TokenPool {
        &self.tokens
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Fetch the next batch of updates.
    ///
    /// Each rate-limited response rotates to the next token and retries.
    /// Once every token has been tried the poll fails with
    /// [`TelegramError::RateLimited`].
    pub async fn fetch_updates(&mut self, offset: i64) -> Result<Vec<Update>> {
        let attempts = self.tokens.len();
        for _ in 0..attempts {
            let response = self.api.get_updates(self.tokens.current(), offset).await?;
            if response.is_rate_limited() {
                let index = self.tokens.rotate();
                warn!(token_index = index, "Rate limited, rotating bot token");
                continue;
            }
            return Ok(response.into_result()?.unwrap_or_default());
        }
        Err(TelegramError::RateLimited(attempts))
    }

    /// Answer a single update if it carries the command.
    ///
    /// A failed or empty completion sends the apology and leaves the
    /// history without an assistant turn. Send failures are logged only.
    pub async fn handle_update(&mut self, update: &Update) -> UpdateOutcome {
        let Some(message) = &update.message else {
            return UpdateOutcome::Ignored;
        };
        let Some(prompt) = message.text.as_deref().and_then(|t| self.parser.parse(t)) else {
            return UpdateOutcome::Ignored;
        };
        let chat_id = message.chat.id;

        debug!(chat_id, update_id = update.update_id, "Command received");
        self.conversations.push(chat_id, Turn::user(prompt));

        let history = self.conversations.history(chat_id);
        let reply = match self.backend.complete(history).await {
            Ok(reply) if !reply.trim().is_empty() => Some(reply),
            Ok(_) => {
                warn!(chat_id, "Claude returned an empty reply");
                None
            }
            Err(e) => {
                error!(chat_id, error = %e, "Claude request failed");
                None
            }
        };

        match reply {
            Some(reply) => {
                let text = truncate_message(&reply, self.config.max_message_len);
                self.conversations.push(chat_id, Turn::assistant(reply));
                self.send(chat_id, &text).await;
                UpdateOutcome::Replied
            }
            None => {
                self.send(chat_id, APOLOGY).await;
                UpdateOutcome::Apologized
            }
        }
    }

    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(e) = self
            .api
            .send_message(self.tokens.current(), chat_id, text)
            .await
        {
            warn!(chat_id, error = %e, "Failed to send message");
        }
    }

    /// Fetch one batch and handle it in order. `offset` moves one past each
    /// handled update and never goes backwards.
    pub async fn poll_once(&mut self, offset: &mut i64) -> Result<usize> {
        let updates = self.fetch_updates(*offset).await?;
        for update in &updates {
            self.handle_update(update).await;
            *offset = (*offset).max(update.update_id + 1);
        }
        Ok(updates.len())
    }

    /// Poll forever. A failed poll is logged and retried after
    /// `retry_delay`.
    pub async fn run(&mut self) {
        let mut offset = 0;
        info!(tokens = self.tokens.len(), "Bot started. Polling for updates...");

        loop {
            match self.poll_once(&mut offset).await {
                Ok(count) if count > 0 => debug!(count, offset, "Handled updates"),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, offset, "Polling failed");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }
}
