//! `ludo discuss`

use crate::app::App;
use anyhow::{Context, Result};
use clap::Args;
use ludo_core::DiscussionResult;
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub struct DiscussArgs {
    /// Design session id
    #[arg(long)]
    pub session: i64,
    /// Question for the panel
    #[arg(long, short)]
    pub message: String,
    /// Canvas section the question is about
    #[arg(long, short)]
    pub focus: Option<String>,
    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: DiscussArgs) -> Result<()> {
    if args.message.trim().is_empty() {
        anyhow::bail!("Message must not be empty");
    }

    let app = App::from_env().await?;
    let orchestrator = app.orchestrator()?;
    let result = orchestrator
        .discuss(args.session, &args.message, args.focus.as_deref())
        .await
        .context("Discussion failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result));
    }
    Ok(())
}

/// Human-readable report
pub fn render(result: &DiscussionResult) -> String {
    let mut out = String::new();

    for response in &result.agents_responses {
        let marker = if response.success { "" } else { " ⚠️" };
        let _ = writeln!(
            out,
            "{} {}{}\n{}\n",
            response.agent.emoji, response.agent.name, marker, response.response
        );
    }

    let _ = writeln!(out, "📋 Síntese\n{}\n", result.synthesis);

    if !result.suggestions.is_empty() {
        let _ = writeln!(out, "💡 Sugestões");
        for suggestion in &result.suggestions {
            let _ = writeln!(
                out,
                "- [{}] {}: {}",
                suggestion.action, suggestion.section, suggestion.content
            );
            if !suggestion.justification.is_empty() {
                let _ = writeln!(out, "  {}", suggestion.justification);
            }
        }
    }
    out
}
