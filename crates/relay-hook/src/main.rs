//! Prompt hook binary.
//!
//! Register as a `UserPromptSubmit` hook command:
//! ```bash
//! echo '{"prompt": "fix bug -u", "session_id": "abc"}' | relay-hook
//! ```

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use relay_hook::{enhance, write_log, HookContext, HookInput};
use tracing_subscriber::EnvFilter;

/// Relay prompt hook - expand prompt flags into context blocks
#[derive(Parser, Debug)]
#[command(name = "relay-hook")]
#[command(about = "Expand prompt flags into injected context")]
struct Args {
    /// Write the invocation log to this file instead of the default
    #[arg(long, env = "RELAY_HOOK_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Do not write the invocation log
    #[arg(long)]
    no_log: bool,

    /// Verbose logging to stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    // stdout belongs to the host, so diagnostics go to stderr
    let filter = match args.verbose {
        0 => "relay_hook=warn",
        1 => "relay_hook=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("[Hook Error: {}]", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> relay_hook::Result<()> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let input = HookInput::from_json(&raw)?;

    let ctx = HookContext::current()?;
    let outcome = enhance(&input, &ctx);

    if let Some(text) = &outcome.output {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }

    if !args.no_log {
        let path = args
            .log_file
            .clone()
            .unwrap_or_else(relay_core::hook_log_file);
        write_log(&path, &outcome.record);
    }

    Ok(())
}
