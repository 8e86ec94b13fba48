//! Prompt rendering

use super::registry::AgentProfile;
use crate::context::SessionContext;

/// Ideas shown in a prompt
const PROMPT_IDEAS: usize = 5;
/// Objectives shown in a prompt
const PROMPT_OBJECTIVES: usize = 3;
/// Notes shown per canvas section
const PROMPT_NOTES_PER_SECTION: usize = 2;

/// Renders agent prompts from their templates
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Create a builder
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Full prompt for `profile` answering `message`
    #[must_use]
    pub fn build(&self, profile: &AgentProfile, context: &SessionContext, message: &str) -> String {
        let template = &profile.template;
        let focus = template
            .focus
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{role}\n\n{context}\n\nMENSAGEM DO USUÁRIO: {message}\n\n{heading}\n{focus}\n\n{closing}",
            role = template.role,
            context = render_context(context),
            heading = template.focus_heading,
            closing = template.closing,
        )
    }
}

/// Text form of a session context, as embedded in prompts
///
/// Empty parts are omitted; the header is always present.
#[must_use]
pub fn render_context(context: &SessionContext) -> String {
    let mut parts = vec!["=== CONTEXTO DO PROJETO DE JOGO EDUCATIVO ===".to_string()];

    if !context.ideas.is_empty() {
        parts.push("\nIDEIAS DO BRAINSTORMING:".to_string());
        parts.extend(
            context
                .ideas
                .iter()
                .take(PROMPT_IDEAS)
                .map(|idea| format!("- {idea}")),
        );
    }

    if let Some(answers) = &context.reflection_answers {
        parts.push("\nREFLEXÃO SOCRÁTICA:".to_string());
        parts.push(format!("Problema: {}", answers.problem));
        parts.push(format!("Motivação: {}", answers.motivation));
    }

    if !context.objectives.is_empty() {
        parts.push("\nOBJETIVOS EDUCACIONAIS:".to_string());
        parts.extend(
            context
                .objectives
                .iter()
                .take(PROMPT_OBJECTIVES)
                .map(|o| format!("- {} ({})", o.text, o.level)),
        );
    }

    let sections: Vec<String> = context
        .canvas_notes
        .iter()
        .filter(|(_, notes)| !notes.is_empty())
        .map(|(section, notes)| {
            let shown: Vec<&str> = notes
                .iter()
                .take(PROMPT_NOTES_PER_SECTION)
                .map(String::as_str)
                .collect();
            format!("{section}: {}", shown.join(", "))
        })
        .collect();
    if !sections.is_empty() {
        parts.push("\nCANVAS ATUAL:".to_string());
        parts.extend(sections);
    }

    parts.join("\n")
}
