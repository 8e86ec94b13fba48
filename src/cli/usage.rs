//! `ludo usage`

use anyhow::Result;
use clap::Args;
use ludo_llm::UsageStats;
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub struct UsageArgs {
    /// Restrict to one design session
    #[arg(long)]
    pub session: Option<i64>,
    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: UsageArgs) -> Result<()> {
    let config = crate::app::load_config()?;
    let store = crate::app::open_store(&config).await?;
    let stats = store.usage_stats(args.session).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render(&stats, args.session));
    }
    Ok(())
}

pub fn render(stats: &UsageStats, session: Option<i64>) -> String {
    let mut out = String::new();
    let scope = session
        .map(|id| format!("session {}", id))
        .unwrap_or_else(|| "all sessions".to_string());

    let _ = writeln!(out, "📊 LLM usage ({})\n", scope);
    if stats.total_requests == 0 {
        let _ = writeln!(out, "No requests logged.");
        return out;
    }

    let _ = writeln!(
        out,
        "Requests: {} ({} ok, {} failed)",
        stats.total_requests, stats.successful_requests, stats.failed_requests
    );
    let _ = writeln!(out, "Tokens:   {}", stats.total_tokens);
    let _ = writeln!(out, "Latency:  {:.0} ms avg", stats.avg_latency_ms);

    let mut modules: Vec<_> = stats.by_module.values().collect();
    modules.sort_by(|a, b| a.module_tag.cmp(&b.module_tag));
    let _ = writeln!(out, "\nBy module:");
    for module in modules {
        let _ = writeln!(
            out,
            "  {:<24} {:>5} req {:>8} tok",
            module.module_tag, module.request_count, module.total_tokens
        );
    }

    let mut models: Vec<_> = stats.by_model.iter().collect();
    models.sort();
    let _ = writeln!(out, "\nBy model:");
    for (model, count) in models {
        let _ = writeln!(out, "  {:<24} {:>5} req", model, count);
    }
    out
}
