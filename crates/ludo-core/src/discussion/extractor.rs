//! Suggestion extraction
//!
//! The synthesis is free text. A second dispatch asks the model to restate it
//! as JSON; whatever comes back is parsed best-effort and anything unusable
//! collapses to a single generic suggestion. Items of a parsed list are kept
//! as the model wrote them; only items that are not objects are dropped.

use super::types::{Suggestion, SuggestionAction};
use crate::json::extract_json_object;
use ludo_llm::util::truncate_chars;
use ludo_llm::BackendAdapter;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Module tag for extraction dispatches
pub const EXTRACTION_MODULE_TAG: &str = "suggestion_extraction";

/// Section of the generic fallback suggestion
pub const FALLBACK_SECTION: &str = "Geral";

/// Justification of the generic fallback suggestion
pub const FALLBACK_JUSTIFICATION: &str = "Sugestão baseada na discussão dos agentes especialistas";

/// Characters of the synthesis kept in the fallback suggestion
const FALLBACK_CONTENT_CHARS: usize = 200;

/// Result of parsing an extraction response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A non-empty list of suggestions
    Parsed(Vec<Suggestion>),
    /// No `{ ... }` region in the text
    NoJson,
    /// The region did not deserialize
    Invalid(String),
    /// Valid JSON with no suggestions
    Empty,
}

#[derive(Deserialize)]
struct SuggestionList {
    #[serde(default)]
    suggestions: Option<Vec<Value>>,
}

/// Turns a synthesis into structured suggestions
#[derive(Debug, Clone)]
pub struct SuggestionExtractor {
    adapter: BackendAdapter,
    max_tokens: u32,
}

impl SuggestionExtractor {
    /// Create an extractor dispatching through `adapter`
    pub fn new(adapter: BackendAdapter, max_tokens: u32) -> Self {
        Self {
            adapter,
            max_tokens,
        }
    }

    /// Extraction prompt for `synthesis`
    #[must_use]
    pub fn prompt(synthesis: &str) -> String {
        format!(
            r#"A partir da seguinte síntese de agentes especialistas, extraia sugestões específicas e acionáveis para o Game Design Canvas:

{synthesis}

Formate as sugestões como uma lista JSON com a seguinte estrutura:
{{
  "suggestions": [
    {{
      "section": "Nome da Seção do Canvas",
      "action": "add|modify|remove",
      "content": "Conteúdo específico da sugestão",
      "justification": "Justificativa para a sugestão"
    }}
  ]
}}

Foque em sugestões práticas que podem ser implementadas diretamente no canvas."#
        )
    }

    /// Parse a model response
    #[must_use]
    pub fn parse(text: &str) -> ParseOutcome {
        let Some(json) = extract_json_object(text.trim()) else {
            return ParseOutcome::NoJson;
        };
        let list = match serde_json::from_str::<SuggestionList>(json) {
            Ok(list) => list,
            Err(e) => return ParseOutcome::Invalid(e.to_string()),
        };

        let suggestions: Vec<Suggestion> = list
            .suggestions
            .unwrap_or_default()
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();

        if suggestions.is_empty() {
            ParseOutcome::Empty
        } else {
            ParseOutcome::Parsed(suggestions)
        }
    }

    /// Generic suggestion carrying the head of the synthesis
    #[must_use]
    pub fn fallback(synthesis: &str) -> Suggestion {
        Suggestion {
            section: FALLBACK_SECTION.to_string(),
            action: SuggestionAction::Add,
            content: format!("{}...", truncate_chars(synthesis, FALLBACK_CONTENT_CHARS)),
            justification: FALLBACK_JUSTIFICATION.to_string(),
        }
    }

    /// Extract suggestions from `synthesis`; never empty, never fails
    #[instrument(skip(self, synthesis), fields(synthesis_len = synthesis.len()))]
    pub async fn extract(&self, synthesis: &str, session_id: Option<i64>) -> Vec<Suggestion> {
        let result = self
            .adapter
            .dispatch(
                &Self::prompt(synthesis),
                EXTRACTION_MODULE_TAG,
                session_id,
                self.max_tokens,
            )
            .await;

        let Some(text) = result.content.filter(|_| result.success) else {
            warn!(error = ?result.error_message, "Extraction dispatch failed, using fallback");
            return vec![Self::fallback(synthesis)];
        };

        match Self::parse(&text) {
            ParseOutcome::Parsed(suggestions) => {
                debug!(count = suggestions.len(), "Suggestions extracted");
                suggestions
            }
            outcome => {
                warn!(outcome = ?outcome, "Unusable extraction output, using fallback");
                vec![Self::fallback(synthesis)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_llm::{BackendKind, NullUsageSink, ScriptedBackend};
    use std::sync::Arc;

    const VALID: &str = r#"Aqui estão as sugestões:
```json
{
  "suggestions": [
    {"section": "Narrativa", "action": "add", "content": "Mentor chef", "justification": "Guia o jogador"},
    {"section": "Mecânicas de Jogo", "action": "modify", "content": "Pontos por receita", "justification": "Feedback"}
  ]
}
```"#;

    fn extractor(backend: Arc<ScriptedBackend>) -> SuggestionExtractor {
        SuggestionExtractor::new(BackendAdapter::new(backend, Arc::new(NullUsageSink)), 1000)
    }

    #[test]
    fn test_parse_embedded_blob() {
        let ParseOutcome::Parsed(suggestions) = SuggestionExtractor::parse(VALID) else {
            panic!("expected parsed suggestions");
        };
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].section, "Narrativa");
        assert_eq!(suggestions[1].action, SuggestionAction::Modify);
    }

    #[test]
    fn test_parse_outcomes() {
        assert_eq!(SuggestionExtractor::parse("nada de json"), ParseOutcome::NoJson);
        assert_eq!(
            SuggestionExtractor::parse(r#"{"suggestions": []}"#),
            ParseOutcome::Empty
        );
        assert_eq!(SuggestionExtractor::parse(r#"{"outra": 1}"#), ParseOutcome::Empty);
        assert!(matches!(
            SuggestionExtractor::parse("{ isto não é json }"),
            ParseOutcome::Invalid(_)
        ));
        assert!(matches!(
            SuggestionExtractor::parse(r#"{"suggestions": "nenhuma"}"#),
            ParseOutcome::Invalid(_)
        ));
        assert_eq!(
            SuggestionExtractor::parse(r#"{"suggestions": ["texto solto", 3]}"#),
            ParseOutcome::Empty
        );
    }

    #[test]
    fn test_parse_keeps_items_as_written() {
        let text = r#"blah {"suggestions":[
            {"section":"Narrativa","action":"Add","content":"Mentor chef","justification":"Guia"},
            {"section":"Tecnologia","action":"modify","content":"Modo offline","justification":null},
            {"section":"Regras","action":"update","content":"Turnos curtos"},
            "solto"
        ]} trailing"#;

        let ParseOutcome::Parsed(suggestions) = SuggestionExtractor::parse(text) else {
            panic!("expected parsed suggestions");
        };
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].action, SuggestionAction::Add);
        assert_eq!(suggestions[1].action, SuggestionAction::Modify);
        assert_eq!(suggestions[1].justification, "");
        assert_eq!(suggestions[2].action, SuggestionAction::Other("update".to_string()));
        assert_eq!(suggestions[2].content, "Turnos curtos");
    }

    #[test]
    fn test_parse_template_placeholder_action_is_kept() {
        let ParseOutcome::Parsed(suggestions) = SuggestionExtractor::parse(
            r#"{"suggestions": [{"section": "X", "action": "add|modify|remove", "content": "c"}]}"#,
        ) else {
            panic!("expected parsed suggestions");
        };
        assert_eq!(
            suggestions[0].action,
            SuggestionAction::Other("add|modify|remove".to_string())
        );
    }

    #[test]
    fn test_parse_missing_justification_defaults_empty() {
        let ParseOutcome::Parsed(suggestions) = SuggestionExtractor::parse(
            r#"{"suggestions": [{"section": "Tecnologia", "action": "remove", "content": "VR"}]}"#,
        ) else {
            panic!("expected parsed suggestions");
        };
        assert!(suggestions[0].justification.is_empty());
    }

    #[test]
    fn test_fallback_truncates_by_characters() {
        let synthesis = "ç".repeat(250);
        let suggestion = SuggestionExtractor::fallback(&synthesis);

        assert_eq!(suggestion.section, "Geral");
        assert_eq!(suggestion.action, SuggestionAction::Add);
        assert_eq!(suggestion.content.chars().count(), 203);
        assert!(suggestion.content.ends_with("..."));
        assert_eq!(suggestion.justification, FALLBACK_JUSTIFICATION);
    }

    #[test]
    fn test_fallback_short_synthesis() {
        assert_eq!(SuggestionExtractor::fallback("Curta").content, "Curta...");
    }

    #[tokio::test]
    async fn test_extract_parsed() {
        let backend = Arc::new(ScriptedBackend::chat());
        backend.push_text(VALID, 80);

        let suggestions = extractor(backend.clone()).extract("síntese", Some(2)).await;

        assert_eq!(suggestions.len(), 2);
        assert!(backend.prompts()[0].contains("\"action\": \"add|modify|remove\""));
    }

    #[tokio::test]
    async fn test_extract_unparseable_falls_back() {
        let backend = Arc::new(ScriptedBackend::chat());
        backend.push_text("Desculpe, não consigo formatar.", 10);

        let suggestions = extractor(backend).extract("Use um mentor.", None).await;

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].content, "Use um mentor....");
    }

    #[tokio::test]
    async fn test_extract_dispatch_failure_falls_back() {
        let backend = Arc::new(ScriptedBackend::failing(BackendKind::ChatCompletion, 503));

        let suggestions = extractor(backend).extract("Use um mentor.", None).await;

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].section, FALLBACK_SECTION);
    }
}
