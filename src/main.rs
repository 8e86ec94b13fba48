//! Ludo - multi-agent assistant for educational game design
//!
//! Command output goes to stdout and logs to stderr, so `--json` output can
//! be piped as is.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    // GROQ_API_KEY and GEMINI_API_KEY usually live in .env
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_filter().into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(json = cli.wants_json(), "ludo v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli).await
}
