//! Relay Core - shared configuration for the relay binaries.
//!
//! Both interfaces (the prompt hook and the Telegram bridge) use this crate
//! to locate their directories and load secrets from env files:
//!
//! - **config**: State, config and log directory resolution
//! - **env**: `.env` file loading for API keys and bot tokens

pub mod config;
pub mod env;

pub use config::{config_dir, env_file, hook_log_dir, hook_log_file, state_dir};
pub use env::load_env;
