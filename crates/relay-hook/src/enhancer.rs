//! Prompt enhancement: turns one hook payload into injected context and a
//! log record.

use std::path::PathBuf;

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::context::{branch_block, current_branch, date_block, format_date};
use crate::defaults::should_apply_defaults;
use crate::error::Result;
use crate::flags::parse_flags;
use crate::handlers::FlagHandler;
use crate::log::LogRecord;

/// Prompt that triggers help without a dash.
const BARE_HELP: &str = "hh";

/// Clean prompt substituted for a help request with no other text.
const HELP_PROMPT: &str = "Show available hook flags";

/// Session id recorded when the host does not send one.
const UNKNOWN_SESSION: &str = "unknown";

/// Payload read from standard input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    /// The prompt the user submitted.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Host session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl HookInput {
    /// Parse the stdin payload.
    ///
    /// # Errors
    /// Returns [`crate::HookError::InvalidInput`] for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Create an input from a prompt (for testing and direct use).
    pub fn new(prompt: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            session_id: Some(session_id.into()),
        }
    }

    fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }

    fn session_id(&self) -> &str {
        self.session_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SESSION)
    }
}

/// Environment the hook runs in.
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Directory used for ecosystem detection.
    pub working_dir: PathBuf,
    /// Invocation time.
    pub now: DateTime<Local>,
    /// Checked-out git branch, if any.
    pub git_branch: Option<String>,
}

impl HookContext {
    /// Capture the current directory, time, and git branch.
    ///
    /// # Errors
    /// Returns an error if the current directory cannot be read.
    pub fn current() -> Result<Self> {
        let working_dir = std::env::current_dir()?;
        let git_branch = current_branch(&working_dir);
        Ok(Self {
            working_dir,
            now: Local::now(),
            git_branch,
        })
    }
}

/// Result of one hook invocation.
#[derive(Debug, Clone)]
pub struct HookOutcome {
    /// Text for stdout; `None` when no block was produced.
    pub output: Option<String>,
    /// Record to append to the hook log.
    pub record: LogRecord,
}

/// Collects context blocks in injection order.
#[derive(Debug, Default)]
struct PromptEnhancer {
    contexts: Vec<String>,
}

impl PromptEnhancer {
    /// Add a block; blank blocks are dropped and others trimmed.
    fn add_context(&mut self, context: &str) {
        let trimmed = context.trim();
        if !trimmed.is_empty() {
            self.contexts.push(trimmed.to_string());
        }
    }

    fn finish(self) -> Option<String> {
        if self.contexts.is_empty() {
            None
        } else {
            Some(self.contexts.join("\n"))
        }
    }
}

fn base_record(input: &HookInput, ctx: &HookContext) -> LogRecord {
    LogRecord {
        timestamp: ctx
            .now
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        formatted_date: format_date(&ctx.now),
        original_prompt: input.prompt().to_string(),
        session_id: input.session_id().to_string(),
        ..Default::default()
    }
}

/// Run the hook logic for one payload.
///
/// Output order is date, git branch, default standards (when applicable),
/// then one block per recognized flag in flag order.
pub fn enhance(input: &HookInput, ctx: &HookContext) -> HookOutcome {
    let prompt = input.prompt();
    let mut record = base_record(input, ctx);
    let mut enhancer = PromptEnhancer::default();

    if prompt.trim().eq_ignore_ascii_case(BARE_HELP) {
        debug!("Bare help request");
        enhancer.add_context(&date_block(&ctx.now));
        enhancer.add_context(&FlagHandler::Help.render(&ctx.working_dir));
        record.flags = vec![BARE_HELP.to_string()];
        record.clean_prompt = String::new();
        record.help_request = Some(true);
        record.applied_flags = vec![BARE_HELP.to_string()];
        let output = enhancer.finish();
        record.injected_context = output.clone();
        return HookOutcome { output, record };
    }

    let parsed = parse_flags(prompt);
    let resolved: Vec<(&str, Option<FlagHandler>)> = parsed
        .flags
        .iter()
        .map(|f| (f.as_str(), FlagHandler::lookup(f)))
        .collect();
    let has = |wanted: FlagHandler| resolved.iter().any(|(_, h)| *h == Some(wanted));

    let is_help = has(FlagHandler::Help);
    let mut clean_prompt = parsed.clean_prompt.clone();
    if is_help && clean_prompt.trim().is_empty() {
        clean_prompt = HELP_PROMPT.to_string();
        record.help_request = Some(true);
    }
    record.flags = parsed.flags.clone();
    record.clean_prompt = clean_prompt.clone();

    enhancer.add_context(&date_block(&ctx.now));
    if let Some(branch) = &ctx.git_branch {
        enhancer.add_context(&branch_block(branch));
    }

    if !is_help
        && !has(FlagHandler::EngineeringStandards)
        && should_apply_defaults(&clean_prompt)
    {
        enhancer.add_context(&FlagHandler::EngineeringStandards.render(&ctx.working_dir));
        record.auto_applied_standards = Some(true);
    }

    let mut applied = Vec::new();
    for (flag, handler) in &resolved {
        match handler {
            Some(handler) => {
                enhancer.add_context(&handler.render(&ctx.working_dir));
                applied.push((*flag).to_string());
            }
            None => debug!(flag = %flag, "Ignoring unknown flag"),
        }
    }
    record.applied_flags = applied;

    let output = enhancer.finish();
    record.injected_context = output.clone();
    HookOutcome { output, record }
}
