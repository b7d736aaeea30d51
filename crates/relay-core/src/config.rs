//! Shared configuration paths.
//!
//! # Storage Structure
//!
//! Relay's own files live under `~/.relay/`:
//!
//! ```text
//! ~/.relay/
//! └── config/       # User configuration files
//!     └── .env.local
//! ```
//!
//! The prompt hook logs next to the host CLI's own logs, in
//! `~/.claude/logs/prompt_hooks.jsonl`.
//!
//! # Environment Variables
//!
//! - `RELAY_STATE_DIR`: Override the base state directory
//! - `RELAY_CONFIG_DIR`: Override the config directory
//! - `RELAY_HOOK_LOG_DIR`: Override the prompt hook log directory

use std::path::{Path, PathBuf};

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "RELAY_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "RELAY_CONFIG_DIR";

/// Environment variable for custom hook log directory.
pub const HOOK_LOG_DIR_ENV: &str = "RELAY_HOOK_LOG_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".relay";

/// Host CLI directory holding the hook log directory.
const HOST_DIR: &str = ".claude";

const CONFIG_SUBDIR: &str = "config";
const LOGS_SUBDIR: &str = "logs";

/// File name of the prompt hook log.
pub const HOOK_LOG_FILE_NAME: &str = "prompt_hooks.jsonl";

/// Resolve a directory from an optional override, falling back to a path
/// relative to the home directory (or the current directory without one).
fn resolve_dir(override_value: Option<String>, home: Option<PathBuf>, relative: &Path) -> PathBuf {
    match override_value {
        Some(value) if !value.trim().is_empty() => {
            PathBuf::from(shellexpand::tilde(value.trim()).to_string())
        }
        _ => home
            .map(|h| h.join(relative))
            .unwrap_or_else(|| relative.to_path_buf()),
    }
}

/// Get the relay state directory.
///
/// The state directory is determined by:
/// 1. `RELAY_STATE_DIR` environment variable if set
/// 2. `~/.relay` if home directory is available
/// 3. `.relay` in current directory as fallback
pub fn state_dir() -> PathBuf {
    resolve_dir(
        std::env::var(STATE_DIR_ENV).ok(),
        dirs::home_dir(),
        Path::new(DEFAULT_STATE_DIR),
    )
}

/// Get the user config directory.
///
/// Defaults to `~/.relay/config/` or `RELAY_CONFIG_DIR` env var.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| PathBuf::from(shellexpand::tilde(v.trim()).to_string()))
        .unwrap_or_else(|| state_dir().join(CONFIG_SUBDIR))
}

/// Get the .env.local file path.
///
/// Environment file for secrets (bot tokens, API keys).
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Get the prompt hook log directory.
///
/// Defaults to `~/.claude/logs/` or `RELAY_HOOK_LOG_DIR` env var.
pub fn hook_log_dir() -> PathBuf {
    resolve_dir(
        std::env::var(HOOK_LOG_DIR_ENV).ok(),
        dirs::home_dir(),
        &Path::new(HOST_DIR).join(LOGS_SUBDIR),
    )
}

/// Get the prompt hook log file path.
pub fn hook_log_file() -> PathBuf {
    hook_log_dir().join(HOOK_LOG_FILE_NAME)
}
