//! `ludo assist`

use crate::app::App;
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use ludo_core::stages::{parse_lines, parse_objectives, parse_reflection_answers};
use ludo_core::{ContextAggregator, DesignStore, SqliteStore, StageAssistant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// New game ideas
    Brainstorm,
    /// Suggested answers to the reflection questions
    Reflection,
    /// One learning objective per taxonomy level
    Objectives,
    /// Suggestions for one canvas section
    Canvas,
}

#[derive(Args, Debug)]
pub struct AssistArgs {
    /// Pipeline stage
    #[arg(value_enum)]
    pub stage: Stage,
    /// Design session id
    #[arg(long)]
    pub session: i64,
    /// Canvas section (required for `canvas`)
    #[arg(long)]
    pub section: Option<String>,
    /// Store the parsed suggestions in the session
    #[arg(long)]
    pub save: bool,
}

/// Parsed stage output
#[derive(Debug, Default, PartialEq)]
pub struct AssistOutcome {
    pub text: String,
    pub items: Vec<String>,
    pub saved: usize,
}

pub async fn run(args: AssistArgs) -> Result<()> {
    let app = App::from_env().await?;
    let assistant = app.stage_assistant();
    let outcome = execute(&app.store, &assistant, &args).await?;

    if outcome.items.is_empty() {
        println!("{}", outcome.text);
    } else {
        for item in &outcome.items {
            println!("- {}", item);
        }
    }
    if args.save {
        println!("\n✅ {} item(s) saved to session {}", outcome.saved, args.session);
    }
    Ok(())
}

/// Dispatch the stage prompt, parse the reply and optionally persist it
pub async fn execute(
    store: &SqliteStore,
    assistant: &StageAssistant,
    args: &AssistArgs,
) -> Result<AssistOutcome> {
    let session = args.session;

    let result = match args.stage {
        Stage::Brainstorm => {
            let ideas = store.ideas(session).await?;
            assistant.brainstorm_ideas(session, &ideas).await
        }
        Stage::Reflection => {
            let ideas = store.ideas(session).await?;
            if ideas.is_empty() {
                bail!("Session {} has no ideas to reflect on", session);
            }
            assistant.reflection_suggestions(session, &ideas).await
        }
        Stage::Objectives => {
            let Some(answers) = store.reflection_answers(session).await? else {
                bail!("Session {} has no reflection answers", session);
            };
            assistant.bloom_objectives(session, &answers).await
        }
        Stage::Canvas => {
            let Some(section) = args.section.as_deref() else {
                bail!("--section is required for the canvas stage");
            };
            let context = ContextAggregator::new(std::sync::Arc::new(store.clone()))
                .build(session)
                .await?;
            assistant
                .canvas_section_suggestions(session, &context, section)
                .await
        }
    };

    let text = match (result.content(), result.error_message()) {
        (Some(text), _) if result.success => text.to_string(),
        (_, Some(error)) => bail!("Assistant request failed: {}", error),
        _ => bail!("Assistant returned an empty response"),
    };

    let mut outcome = AssistOutcome {
        text,
        ..Default::default()
    };

    match args.stage {
        Stage::Brainstorm => {
            outcome.items = parse_lines(&outcome.text);
            if args.save {
                for idea in &outcome.items {
                    store.add_idea(session, idea).await?;
                }
                outcome.saved = outcome.items.len();
            }
        }
        Stage::Reflection => {
            if let Some(answers) = parse_reflection_answers(&outcome.text) {
                outcome.items = vec![
                    format!("Problema: {}", answers.problem),
                    format!("Justificação: {}", answers.justification),
                    format!("Impacto: {}", answers.impact),
                    format!("Motivação: {}", answers.motivation),
                ];
                if args.save {
                    store.save_reflection_answers(session, &answers).await?;
                    outcome.saved = 1;
                }
            }
        }
        Stage::Objectives => {
            let objectives = parse_objectives(&outcome.text);
            outcome.items = objectives
                .iter()
                .map(|o| format!("[{}] {}", o.level, o.text))
                .collect();
            if args.save {
                for objective in &objectives {
                    store.add_objective(session, objective).await?;
                }
                outcome.saved = objectives.len();
            }
        }
        Stage::Canvas => {
            outcome.items = parse_lines(&outcome.text);
            if args.save {
                let section = args.section.as_deref().unwrap_or_default();
                for note in &outcome.items {
                    store.add_canvas_note(session, section, note).await?;
                }
                outcome.saved = outcome.items.len();
            }
        }
    }

    Ok(outcome)
}
