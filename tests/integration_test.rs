//! Integration tests for Ludo
//!
//! These tests verify the integration between the crates and the binary:
//! - ludo-llm: dispatch adapter, usage sinks and scripted backends
//! - ludo-core: SQLite store, stage assistants and the orchestrator
//! - ludo: command-line surface

use std::process::Command;
use std::sync::Arc;

use ludo_core::discussion::{AGENT_MODULE_TAG, EXTRACTION_MODULE_TAG, SYNTHESIS_MODULE_TAG};
use ludo_core::stages::{parse_lines, BRAINSTORM_MODULE_TAG};
use ludo_core::{AgentId, Backends, DiscussionConfig, Orchestrator, SqliteStore, StageAssistant};
use ludo_llm::{BackendAdapter, ScriptedBackend, UsageLog, UsageSink};

// ============================================================================
// Pipeline Integration Tests
// ============================================================================

#[tokio::test]
async fn test_brainstorm_then_discussion_is_logged_per_module() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::new(dir.path().join("ludo.db")).await.unwrap());
    let usage: Arc<dyn UsageSink> = store.clone();

    let chat = Arc::new(ScriptedBackend::chat());
    let generate = Arc::new(ScriptedBackend::generate());
    let backends = Backends::new(
        BackendAdapter::new(chat.clone(), usage.clone()),
        BackendAdapter::new(generate, usage),
    );

    // Stage 1: ideas
    chat.push_text("1. Padaria de frações\n2. Corrida de receitas", 40);
    let assistant = StageAssistant::new(backends.chat.clone(), 1000);
    let reply = assistant.brainstorm_ideas(8, &[]).await;
    assert!(reply.success);
    for idea in parse_lines(reply.content().unwrap_or_default()) {
        store.add_idea(8, &idea).await.unwrap();
    }

    // Stage 2: discussion grounded on those ideas
    let orchestrator = Orchestrator::new(
        store.clone(),
        backends,
        DiscussionConfig {
            selection_seed: Some(5),
            ..Default::default()
        },
    );
    let result = orchestrator
        .discuss(8, "Como melhorar a narrativa?", None)
        .await
        .unwrap();

    assert_eq!(result.context.ideas, vec!["Padaria de frações", "Corrida de receitas"]);
    assert!(result
        .agents_responses
        .iter()
        .any(|r| r.agent.id == AgentId::Narrative));
    assert!(chat.prompts().iter().any(|p| p.contains("Padaria de frações")));

    let stats = store.usage_stats(Some(8)).await.unwrap();
    let agents = result.agents_responses.len() as u64;
    assert_eq!(stats.total_requests, agents + 3);
    assert_eq!(stats.by_module[BRAINSTORM_MODULE_TAG].request_count, 1);
    assert_eq!(stats.by_module[AGENT_MODULE_TAG].request_count, agents);
    assert_eq!(stats.by_module[SYNTHESIS_MODULE_TAG].request_count, 1);
    assert_eq!(stats.by_module[EXTRACTION_MODULE_TAG].request_count, 1);
    assert_eq!(stats.failed_requests, 0);
}

#[tokio::test]
async fn test_in_memory_usage_log_sees_every_successful_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::new(dir.path().join("ludo.db")).await.unwrap());
    store.add_idea(2, "Quiz de história").await.unwrap();

    let log = Arc::new(UsageLog::new());
    let sink: Arc<dyn UsageSink> = log.clone();
    let backends = Backends::new(
        BackendAdapter::new(Arc::new(ScriptedBackend::chat()), sink.clone()),
        BackendAdapter::new(Arc::new(ScriptedBackend::generate()), sink),
    );

    let result = Orchestrator::new(store.clone(), backends, DiscussionConfig::default())
        .discuss(2, "Quais regras usar?", Some("Mecânicas de Jogo"))
        .await
        .unwrap();

    let entries = log.entries_for_session(2).await;
    assert_eq!(entries.len(), result.agents_responses.len() + 2);
    assert!(entries.iter().all(|e| e.session_id == Some(2)));
    assert!(store.usage_entries(None).await.unwrap().is_empty());
}

// ============================================================================
// Binary Tests
// ============================================================================

#[test]
fn test_binary_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_ludo"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["discuss", "agents", "assist", "usage", "check"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn test_binary_agents_lists_the_panel() {
    let output = Command::new(env!("CARGO_BIN_EXE_ludo"))
        .arg("agents")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in AgentId::ALL {
        assert!(stdout.contains(id.as_str()), "missing {id}");
    }
}

#[test]
fn test_binary_rejects_unknown_stage() {
    let output = Command::new(env!("CARGO_BIN_EXE_ludo"))
        .args(["assist", "poetry", "--session", "1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}
