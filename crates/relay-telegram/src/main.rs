//! Relay Telegram bridge binary.
//!
//! Start the bridge with:
//! ```bash
//! TOKEN_ARRAY='[token1,token2]' ANTHROPIC_API_KEY=xxx cargo run -p relay-telegram
//! ```

use clap::Parser;
use relay_telegram::{Bridge, BridgeConfig, ClaudeClient, ClaudeConfig, HttpTelegramApi, TokenPool};
use tracing_subscriber::EnvFilter;

/// Relay Telegram - answer /claude commands from Telegram
#[derive(Parser, Debug)]
#[command(name = "relay-telegram")]
#[command(about = "Telegram bot that answers a chat command with Claude")]
struct Args {
    /// Command that triggers a reply, without the slash
    #[arg(long, env = "RELAY_COMMAND", default_value = "claude")]
    command: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_URL", default_value = relay_telegram::config::DEFAULT_TELEGRAM_API_URL)]
    api_url: String,

    /// Long-poll timeout in seconds
    #[arg(long, default_value_t = relay_telegram::config::DEFAULT_POLL_TIMEOUT_SECS)]
    poll_timeout: u32,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Env files feed the clap `env` fallbacks, so load them first
    relay_core::load_env();
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "relay_telegram=info",
        1 => "relay_telegram=debug",
        2 => "relay_telegram=trace,reqwest=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(filter))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let tokens = TokenPool::from_env()?;
    let backend = ClaudeClient::from_env(ClaudeConfig::from_env())?;

    let config = BridgeConfig::default()
        .with_command(args.command)
        .with_api_url(args.api_url)
        .with_poll_timeout(args.poll_timeout);
    let api = HttpTelegramApi::new(&config)?;

    tracing::info!(
        tokens = tokens.len(),
        model = %backend.config().model,
        command = %config.command,
        "Bridge initialized"
    );

    let mut bridge = Bridge::new(api, backend, tokens, config)?;
    bridge.run().await;

    Ok(())
}
