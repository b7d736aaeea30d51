//! Relay Telegram - answer a chat command with Claude.
//!
//! The bridge long-polls the Telegram Bot API and replies to
//! `/claude <text>` (or `/claude@botname <text>`) messages:
//!
//! - **tokens**: Pool of bot tokens, rotated when Telegram rate limits
//! - **api**: `getUpdates` / `sendMessage` over HTTP
//! - **claude**: Anthropic Messages API backend
//! - **history**: Last 20 turns per chat, kept in memory
//! - **bridge**: The polling loop tying them together
//!
//! # Example
//!
//! ```ignore
//! use relay_telegram::{Bridge, BridgeConfig, ClaudeClient, ClaudeConfig, HttpTelegramApi, TokenPool};
//!
//! let config = BridgeConfig::default();
//! let api = HttpTelegramApi::new(&config)?;
//! let backend = ClaudeClient::from_env(ClaudeConfig::from_env())?;
//! let mut bridge = Bridge::new(api, backend, TokenPool::from_env()?, config)?;
//! bridge.run().await;
//! ```

pub mod api;
pub mod bridge;
pub mod claude;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod tokens;

pub use api::{ApiResponse, Chat, HttpTelegramApi, Message, TelegramApi, Update};
pub use bridge::{Bridge, UpdateOutcome, APOLOGY};
pub use claude::{ChatBackend, ClaudeClient, ClaudeConfig};
pub use command::{truncate_message, CommandParser};
pub use config::BridgeConfig;
pub use error::{Result, TelegramError};
pub use history::{ConversationStore, Role, Turn};
pub use tokens::TokenPool;
