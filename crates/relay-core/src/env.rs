//! Environment file loading.

use std::path::Path;

use tracing::debug;

use crate::config::env_file;

/// Load environment variables from the relay config directory, then from a
/// local `.env.local` or `.env` in the working directory.
///
/// Variables already present in the process environment are never
/// overridden. Missing files are not an error.
pub fn load_env() {
    let path = env_file();
    load_env_from(&path);

    match dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv()) {
        Ok(path) => debug!(path = %path.display(), "Loaded local env file"),
        Err(e) => debug!(error = %e, "No local env file loaded"),
    }
}

/// Load a single env file if it exists. Returns whether anything was loaded.
pub fn load_env_from(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded env file");
            true
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Failed to load env file");
            false
        }
    }
}
