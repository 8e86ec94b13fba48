//! `ludo agents`

use ludo_core::{AgentRegistry, RoutingTable};
use ludo_llm::BackendKind;

pub fn run() -> anyhow::Result<()> {
    let config = crate::app::load_config()?;
    let registry = AgentRegistry::default();
    let routes = config.discussion.routing_table()?;

    println!("🎲 Ludo agents\n");
    print!("{}", render(&registry, &routes));
    Ok(())
}

fn backend_label(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::ChatCompletion => "groq",
        BackendKind::GenerateContent => "gemini",
    }
}

/// One block per agent with the keywords that route to it
pub fn render(registry: &AgentRegistry, routes: &RoutingTable) -> String {
    let mut out = String::new();
    for profile in registry.iter() {
        out.push_str(&format!(
            "{} {} ({}, {})\n   {}\n",
            profile.emoji,
            profile.display_name,
            profile.id,
            backend_label(profile.backend),
            profile.description
        ));

        let keywords: Vec<&str> = routes
            .keywords()
            .filter(|keyword| routes.keyword_matches(keyword).any(|id| id == profile.id))
            .collect();
        if !keywords.is_empty() {
            out.push_str(&format!("   palavras-chave: {}\n", keywords.join(", ")));
        }
        out.push('\n');
    }
    out
}
