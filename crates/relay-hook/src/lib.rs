//! Prompt submit hook that expands flag tokens into context blocks.
//!
//! The host CLI pipes a JSON payload (`{"prompt": ..., "session_id": ...}`)
//! to the hook on every prompt. The hook strips flags such as `-u` or
//! `-debug` from the start and end of the prompt, and prints directive text
//! for each recognized flag to stdout, which the host adds to the model
//! input.
//!
//! # Flags
//!
//! - `-u`, `-ultrathink`: maximum thinking
//! - `-th`, `-t`: harder / step-by-step thinking
//! - `-e`, `-eng`, `-standards`: engineering standards
//! - `-p`, `-v`, `-s`, `-test`, `-doc`, `-perf`, `-review`, `-refactor`,
//!   `-debug`, `-api`, `-clean`, `-ng`: development modes
//! - `-ctx`: detected project ecosystems
//! - `-hh`: flag reference (a bare `hh` prompt works too)
//!
//! The current date and git branch are always injected, and the engineering
//! standards block is added for anything that does not look like a quick
//! question.
//!
//! # Example
//!
//! ```no_run
//! use relay_hook::{enhance, HookContext, HookInput};
//!
//! let input = HookInput::from_json(r#"{"prompt": "fix bug -u", "session_id": "abc"}"#)?;
//! let outcome = enhance(&input, &HookContext::current()?);
//! if let Some(text) = outcome.output {
//!     print!("{}", text);
//! }
//! # Ok::<(), relay_hook::HookError>(())
//! ```

pub mod context;
pub mod defaults;
pub mod enhancer;
pub mod error;
pub mod flags;
pub mod handlers;
pub mod log;

pub use enhancer::{enhance, HookContext, HookInput, HookOutcome};
pub use error::{HookError, Result};
pub use flags::{parse_flags, ParsedPrompt};
pub use handlers::FlagHandler;
pub use log::{append_record, write_log, LogRecord};
