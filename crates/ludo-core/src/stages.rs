//! Stage assistants
//!
//! Single-prompt helpers for the design pipeline stages that precede the
//! discussion: idea generation, guided reflection, learning objectives and
//! per-section canvas suggestions. Each helper returns the raw
//! [`DispatchResult`]; the `parse_*` functions turn the text into values.

use crate::agents::render_context;
use crate::context::{LearningObjective, ReflectionAnswers, SessionContext};
use crate::json::extract_json_object;
use ludo_llm::{BackendAdapter, DispatchResult};
use serde::Deserialize;
use tracing::instrument;

/// Module tag for idea generation
pub const BRAINSTORM_MODULE_TAG: &str = "brainstorm";
/// Module tag for reflection suggestions
pub const REFLECTION_MODULE_TAG: &str = "socratic";
/// Module tag for objective generation
pub const OBJECTIVES_MODULE_TAG: &str = "bloom";
/// Module tag for canvas suggestions
pub const CANVAS_MODULE_TAG: &str = "gamedesign";

/// Prompts for the pipeline stages
#[derive(Debug, Clone)]
pub struct StageAssistant {
    adapter: BackendAdapter,
    max_tokens: u32,
}

impl StageAssistant {
    /// Create an assistant dispatching through `adapter`
    pub fn new(adapter: BackendAdapter, max_tokens: u32) -> Self {
        Self {
            adapter,
            max_tokens,
        }
    }

    /// Three new ideas, complementary to `existing` when there are any
    #[instrument(skip(self, existing), fields(existing = existing.len()))]
    pub async fn brainstorm_ideas(&self, session_id: i64, existing: &[String]) -> DispatchResult {
        let prompt = if existing.is_empty() {
            "Como um especialista em design de jogos educativos, gere 3 ideias criativas e \
             inovadoras para jogos educacionais.\n\
             Foque em diferentes tipos de jogos (digital, tabuleiro, RPG, etc.) e diferentes \
             áreas educacionais.\n\n\
             Responda apenas com as ideias, uma por linha, sem numeração."
                .to_string()
        } else {
            format!(
                "Como um especialista em design de jogos educativos, analise as seguintes ideias \
                 já geradas:\n\n{ideas}\n\n\
                 Baseado nessas ideias existentes, gere 3 novas ideias que sejam:\n\
                 1. Complementares às ideias existentes\n\
                 2. Inovadoras e criativas\n\
                 3. Focadas em diferentes aspectos educacionais\n\n\
                 Responda apenas com as novas ideias, uma por linha, sem numeração.",
                ideas = bullets(existing)
            )
        };
        self.send(&prompt, BRAINSTORM_MODULE_TAG, session_id).await
    }

    /// Suggested answers to the four reflection questions, as JSON
    #[instrument(skip(self, ideas), fields(ideas = ideas.len()))]
    pub async fn reflection_suggestions(&self, session_id: i64, ideas: &[String]) -> DispatchResult {
        let prompt = format!(
            "Como um especialista em método socrático aplicado ao design de jogos educativos, \
             analise as seguintes ideias:\n\n{ideas}\n\n\
             Gere sugestões para responder às seguintes questões socráticas:\n\n\
             1. PROBLEMA: Qual é o principal problema educacional que estas ideias tentam resolver?\n\
             2. JUSTIFICAÇÃO: Por que estas abordagens são adequadas para resolver o problema identificado?\n\
             3. IMPACTO: Qual seria o impacto educacional esperado na aprendizagem dos estudantes?\n\
             4. MOTIVAÇÃO: O que motivaria os estudantes a se engajarem com estes jogos?\n\n\
             Responda em formato JSON:\n\
             {{\"problem\": \"...\", \"justification\": \"...\", \"impact\": \"...\", \"motivation\": \"...\"}}",
            ideas = bullets(ideas)
        );
        self.send(&prompt, REFLECTION_MODULE_TAG, session_id).await
    }

    /// One objective per taxonomy level, as JSON
    #[instrument(skip(self, answers))]
    pub async fn bloom_objectives(&self, session_id: i64, answers: &ReflectionAnswers) -> DispatchResult {
        let prompt = format!(
            "Como um especialista em taxonomia de Bloom, analise o seguinte problema educacional \
             e crie objetivos de aprendizagem:\n\n\
             Problema: {problem}\n\
             Motivação: {motivation}\n\
             Impacto: {impact}\n\n\
             Crie 6 objetivos educacionais, um para cada nível da taxonomia de Bloom (Criar, \
             Avaliar, Analisar, Aplicar, Compreender, Lembrar).\n\
             Os objetivos devem começar com um verbo no infinitivo.\n\n\
             Responda APENAS neste formato JSON, sem texto adicional:\n\
             {{\"objectives\":[{{\"text\":\"[verbo] [resto do objetivo]\",\"level\":\"[nível da taxonomia]\"}}]}}",
            problem = answers.problem,
            motivation = answers.motivation,
            impact = answers.impact,
        );
        self.send(&prompt, OBJECTIVES_MODULE_TAG, session_id).await
    }

    /// Three to five suggestions for one canvas section, one per line
    #[instrument(skip(self, context))]
    pub async fn canvas_section_suggestions(
        &self,
        session_id: i64,
        context: &SessionContext,
        section: &str,
    ) -> DispatchResult {
        let prompt = format!(
            "Como um especialista em design de jogos educativos, gere sugestões para a seção \
             \"{section}\" do Game Design Canvas.\n\n\
             Contexto do projeto:\n{context}\n\n\
             Forneça 3-5 sugestões específicas e práticas para esta seção, considerando:\n\
             - Viabilidade técnica\n\
             - Eficácia educacional\n\
             - Engajamento dos jogadores\n\
             - Recursos necessários\n\n\
             Responda apenas com as sugestões, uma por linha, sem numeração.",
            context = render_context(context),
        );
        self.send(&prompt, CANVAS_MODULE_TAG, session_id).await
    }

    async fn send(&self, prompt: &str, module_tag: &str, session_id: i64) -> DispatchResult {
        self.adapter
            .dispatch(prompt, module_tag, Some(session_id), self.max_tokens)
            .await
    }
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-empty lines with list markers and numbering stripped
#[must_use]
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .strip_prefix(['-', '*', '•'])
        .map(str::trim_start)
        .unwrap_or(line);

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}

/// Reflection answers from a JSON reply; `None` when unusable or blank
#[must_use]
pub fn parse_reflection_answers(text: &str) -> Option<ReflectionAnswers> {
    let json = extract_json_object(text)?;
    serde_json::from_str::<ReflectionAnswers>(json)
        .ok()
        .filter(|answers| !answers.is_blank())
}

#[derive(Deserialize)]
struct ObjectiveList {
    #[serde(default)]
    objectives: Vec<LearningObjective>,
}

/// Learning objectives from a JSON reply; empty when unusable
#[must_use]
pub fn parse_objectives(text: &str) -> Vec<LearningObjective> {
    extract_json_object(text)
        .and_then(|json| serde_json::from_str::<ObjectiveList>(json).ok())
        .map(|list| {
            list.objectives
                .into_iter()
                .filter(|o| !o.text.trim().is_empty())
                .collect()
        })
        .unwrap_or_default()
}
