//! CLI module for Ludo
//!
//! Provides commands:
//! - `discuss`: run a multi-agent discussion for a session
//! - `agents`: list the expert panel
//! - `assist`: single-prompt help for the earlier design stages
//! - `usage`: LLM usage statistics
//! - `check`: configuration and storage diagnostics

use clap::{Parser, Subcommand};

pub mod agents;
pub mod assist;
pub mod check;
pub mod discuss;
pub mod usage;

/// Ludo CLI
#[derive(Parser, Debug)]
#[command(name = "ludo")]
#[command(about = "Multi-agent assistant for educational game design")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the expert panel about a design session
    Discuss(discuss::DiscussArgs),
    /// List the available agents
    Agents,
    /// Generate stage suggestions for a session
    Assist(assist::AssistArgs),
    /// Show LLM usage statistics
    Usage(usage::UsageArgs),
    /// Check configuration, keys and storage
    Check,
}

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "ludo=info,ludo_core=info,ludo_llm=info";

/// Filter for machine-readable output, where only problems are logged
const JSON_LOG_FILTER: &str = "ludo=warn,ludo_core=warn,ludo_llm=warn";

impl Cli {
    /// Whether the command prints JSON to stdout
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Some(Commands::Discuss(args)) => args.json,
            Some(Commands::Usage(args)) => args.json,
            _ => false,
        }
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.wants_json() {
            JSON_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Discuss(args)) => discuss::run(args).await,
        Some(Commands::Agents) => agents::run(),
        Some(Commands::Assist(args)) => assist::run(args).await,
        Some(Commands::Usage(args)) => usage::run(args).await,
        Some(Commands::Check) => check::run().await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
