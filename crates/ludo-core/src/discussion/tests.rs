//! Orchestrator tests

use super::*;
use crate::agents::{AgentId, RoutingTable};
use crate::error::Error;
use crate::store::{MemoryStore, MockDesignStore};
use ludo_llm::{BackendAdapter, BackendKind, ScriptedBackend, UsageLog};
use std::sync::Arc;

struct Harness {
    chat: Arc<ScriptedBackend>,
    generate: Arc<ScriptedBackend>,
    log: Arc<UsageLog>,
    store: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        Self::with_backends(ScriptedBackend::chat(), ScriptedBackend::generate())
    }

    fn with_backends(chat: ScriptedBackend, generate: ScriptedBackend) -> Self {
        Self {
            chat: Arc::new(chat),
            generate: Arc::new(generate),
            log: Arc::new(UsageLog::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    fn backends(&self) -> Backends {
        Backends::new(
            BackendAdapter::new(self.chat.clone(), self.log.clone()),
            BackendAdapter::new(self.generate.clone(), self.log.clone()),
        )
    }

    fn orchestrator(&self, config: DiscussionConfig) -> Orchestrator {
        Orchestrator::new(self.store.clone(), self.backends(), config)
    }
}

fn seeded() -> DiscussionConfig {
    DiscussionConfig {
        selection_seed: Some(7),
        ..Default::default()
    }
}

fn agent_ids(result: &DiscussionResult) -> Vec<AgentId> {
    result.agents_responses.iter().map(|r| r.agent.id).collect()
}

#[tokio::test]
async fn test_coordinator_frames_then_specialists_answer() {
    let h = Harness::new();
    for idea in ["Padaria de frações", "Corrida de receitas", "Mercado"] {
        h.store.add_idea(1, idea).await;
    }
    h.chat.push_text("Diretrizes do coordenador", 20);
    h.generate.push_text("Um chef mentor guia o jogador", 35);
    h.chat.push_text("Síntese das propostas", 40);

    let result = h
        .orchestrator(seeded())
        .discuss(1, "Como melhorar a narrativa?", None)
        .await
        .unwrap();

    assert_eq!(agent_ids(&result), vec![AgentId::Coordinator, AgentId::Narrative]);
    assert_eq!(result.agents_responses[0].response, "Diretrizes do coordenador");
    assert_eq!(result.agents_responses[1].response, "Um chef mentor guia o jogador");
    assert_eq!(result.synthesis, "Síntese das propostas");
    assert_eq!(result.context.ideas.len(), 3);

    let chat_prompts = h.chat.prompts();
    assert_eq!(chat_prompts.len(), 3);
    assert!(chat_prompts[0].starts_with("Você é o Agente Coordenador"));
    assert!(chat_prompts[1].starts_with("Como Agente Coordenador, sintetize"));
    assert!(chat_prompts[1].contains("Especialista em Narrativa: Um chef mentor guia o jogador"));
    assert!(chat_prompts[2].starts_with("A partir da seguinte síntese"));

    let generate_prompts = h.generate.prompts();
    assert_eq!(generate_prompts.len(), 1);
    assert!(generate_prompts[0].contains("- Padaria de frações"));

    let tags: Vec<String> = h
        .log
        .entries()
        .await
        .into_iter()
        .map(|e| e.module_tag)
        .collect();
    assert_eq!(
        tags,
        vec![
            AGENT_MODULE_TAG,
            AGENT_MODULE_TAG,
            SYNTHESIS_MODULE_TAG,
            EXTRACTION_MODULE_TAG
        ]
    );
}

#[tokio::test]
async fn test_without_framing_only_specialists_answer() {
    let h = Harness::new();
    let config = DiscussionConfig {
        coordinator_framing: false,
        ..seeded()
    };

    let result = h
        .orchestrator(config)
        .discuss(1, "Quais regras e qual tecnologia?", None)
        .await
        .unwrap();

    assert_eq!(agent_ids(&result), vec![AgentId::Mechanics, AgentId::Technology]);
    // mechanics + synthesis + extraction
    assert_eq!(h.chat.requests().len(), 3);
    assert_eq!(h.generate.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_agent_does_not_abort_discussion() {
    let h = Harness::with_backends(
        ScriptedBackend::chat(),
        ScriptedBackend::failing(BackendKind::GenerateContent, 503),
    );

    let result = h
        .orchestrator(seeded())
        .discuss(4, "Fale sobre pedagogia", None)
        .await
        .unwrap();

    let pedagogy = &result.agents_responses[1];
    assert_eq!(pedagogy.agent.id, AgentId::Pedagogy);
    assert!(!pedagogy.success);
    assert!(pedagogy.response.starts_with("Erro ao obter resposta: API Error: 503"));
    assert_eq!(result.failed_agents(), 1);

    assert!(h.chat.prompts()[1].contains("Especialista Pedagógico: Erro ao obter resposta"));
    assert!(!result.suggestions.is_empty());
}

#[tokio::test]
async fn test_every_backend_down_still_yields_result() {
    let h = Harness::with_backends(
        ScriptedBackend::failing(BackendKind::ChatCompletion, 500),
        ScriptedBackend::failing(BackendKind::GenerateContent, 500),
    );

    let result = h
        .orchestrator(seeded())
        .discuss(1, "Como melhorar a narrativa?", None)
        .await
        .unwrap();

    assert!(result.agents_responses.iter().all(|r| !r.success));
    assert_eq!(result.synthesis, SYNTHESIS_FALLBACK);
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].section, FALLBACK_SECTION);
    assert_eq!(
        result.suggestions[0].content,
        format!("{SYNTHESIS_FALLBACK}...")
    );
    assert!(h.log.is_empty().await);
}

#[tokio::test]
async fn test_extracted_suggestions_are_returned() {
    let h = Harness::new();
    h.chat.push_text("Enquadramento", 5);
    h.chat.push_text("Recompensas por receita", 5);
    h.chat.push_text("Síntese", 5);
    h.chat.push_text(
        r#"{"suggestions":[{"section":"Mecânicas de Jogo","action":"add","content":"Estrelas por receita","justification":"Feedback imediato"}]}"#,
        5,
    );

    let result = h
        .orchestrator(seeded())
        .discuss(1, "E as mecânicas?", Some("Mecânicas de Jogo"))
        .await
        .unwrap();

    assert_eq!(agent_ids(&result), vec![AgentId::Coordinator, AgentId::Mechanics]);
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].action, SuggestionAction::Add);
    assert_eq!(result.suggestions[0].content, "Estrelas por receita");
}

#[tokio::test]
async fn test_seeded_random_panel_is_reproducible() {
    let first = Harness::new()
        .orchestrator(seeded())
        .discuss(1, "Olá", None)
        .await
        .unwrap();
    let second = Harness::new()
        .orchestrator(seeded())
        .discuss(1, "Olá", None)
        .await
        .unwrap();

    assert_eq!(agent_ids(&first).len(), 3);
    assert_eq!(agent_ids(&first), agent_ids(&second));
}

#[tokio::test]
async fn test_extended_routing_table() {
    let h = Harness::new();
    let orchestrator = h
        .orchestrator(seeded())
        .with_routing_table(RoutingTable::default().with_keyword("avaliação", [AgentId::Pedagogy]));

    let result = orchestrator
        .discuss(1, "Como fazer a avaliação?", None)
        .await
        .unwrap();

    assert_eq!(agent_ids(&result), vec![AgentId::Coordinator, AgentId::Pedagogy]);
}

#[tokio::test]
async fn test_store_failure_is_the_only_error() {
    let mut store = MockDesignStore::new();
    store
        .expect_ideas()
        .returning(|_| Err(Error::Store("no such table: cards".to_string())));

    let h = Harness::new();
    let orchestrator = Orchestrator::new(Arc::new(store), h.backends(), seeded());

    let err = orchestrator.discuss(1, "Oi", None).await.unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    assert!(h.chat.requests().is_empty());
    assert!(h.generate.requests().is_empty());
}

#[test]
fn test_backends_for_kind() {
    let h = Harness::new();
    let backends = h.backends();
    assert_eq!(backends.for_kind(BackendKind::ChatCompletion).model(), "mock-chat");
    assert_eq!(
        backends.for_kind(BackendKind::GenerateContent).model(),
        "mock-generate"
    );
}

#[test]
fn test_connect_binds_services_to_kinds() {
    let backends = Backends::connect(
        ludo_llm::GroqConfig::new("gsk_test_1234567890"),
        ludo_llm::GeminiConfig::new("AIza_test_1234567890"),
        Arc::new(ludo_llm::NullUsageSink),
        false,
    )
    .unwrap();

    assert_eq!(backends.chat.backend_name(), "groq");
    assert_eq!(backends.chat.kind(), BackendKind::ChatCompletion);
    assert_eq!(backends.generate.backend_name(), "gemini");
    assert_eq!(backends.generate.kind(), BackendKind::GenerateContent);
}

#[test]
fn test_result_serialization_field_names() {
    let result = DiscussionResult {
        context: Default::default(),
        agents_responses: Vec::new(),
        synthesis: "s".to_string(),
        suggestions: vec![SuggestionExtractor::fallback("s")],
    };
    let json = serde_json::to_value(&result).unwrap();
    for field in ["context", "agents_responses", "synthesis", "suggestions"] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
}
