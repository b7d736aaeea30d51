//! Append-only JSONL log of hook invocations.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// One record per hook invocation, written as a single JSON line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Invocation time, RFC 3339 in UTC.
    pub timestamp: String,
    /// Human-readable local date.
    pub formatted_date: String,
    /// Prompt exactly as received.
    pub original_prompt: String,
    /// Host session identifier.
    pub session_id: String,
    /// Flags extracted from the prompt boundaries.
    pub flags: Vec<String>,
    /// Prompt with flags removed.
    pub clean_prompt: String,
    /// Set when the invocation was a help request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_request: Option<bool>,
    /// Set when the standards block was injected without an explicit flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_applied_standards: Option<bool>,
    /// Flags that resolved to a handler.
    pub applied_flags: Vec<String>,
    /// Text written to stdout, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_context: Option<String>,
}

/// Append a record to `path` as one JSON line, creating parent directories.
///
/// The line is written with a single `write_all` on an append-mode handle so
/// concurrent invocations do not interleave within a record.
///
/// # Errors
/// Returns an error if the directory, file, or serialization fails.
pub fn append_record(path: &Path, record: &LogRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Append a record, swallowing any failure.
pub fn write_log(path: &Path, record: &LogRecord) {
    if let Err(e) = append_record(path, record) {
        debug!(path = %path.display(), error = %e, "Failed to write hook log");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogRecord {
        LogRecord {
            timestamp: "2026-10-17T09:30:00.000Z".into(),
            formatted_date: "October 17, 2026".into(),
            original_prompt: "fix bug -u".into(),
            session_id: "abc".into(),
            flags: vec!["u".into()],
            clean_prompt: "fix bug".into(),
            applied_flags: vec!["u".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_append_creates_dirs_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prompt_hooks.jsonl");

        append_record(&path, &sample()).unwrap();
        let mut second = sample();
        second.session_id = "def".into();
        append_record(&path, &second).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: LogRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, sample());
        let second: LogRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.session_id, "def");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("help_request").is_none());
        assert!(json.get("auto_applied_standards").is_none());
        assert!(json.get("injected_context").is_none());
        assert_eq!(json["clean_prompt"], "fix bug");
    }

    #[test]
    fn test_write_log_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the log file makes the open fail.
        let path = dir.path().join("log.jsonl");
        std::fs::create_dir(&path).unwrap();
        write_log(&path, &sample());
        assert!(path.is_dir());
    }
}
