//! Error types for the prompt hook.

use thiserror::Error;

/// Errors that can occur while processing a hook invocation.
#[derive(Debug, Error)]
pub enum HookError {
    /// Standard input was not a valid hook payload.
    #[error("Invalid hook input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: HookError = json_err.into();
        assert!(matches!(err, HookError::InvalidInput(_)));
        assert!(err.to_string().starts_with("Invalid hook input:"));
    }
}
