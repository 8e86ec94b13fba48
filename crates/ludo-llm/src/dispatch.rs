//! Dispatch - fault-isolated single request to a backend
//!
//! [`BackendAdapter::dispatch`] never fails: transport errors, non-2xx
//! statuses and malformed bodies all come back as a [`DispatchResult`] with
//! `success == false`. Successful dispatches are appended to the usage log.

use crate::backend::{BackendKind, GenerationRequest, TextGenerationBackend};
use crate::usage::{UsageLogEntry, UsageSink};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Whether the backend produced text
    pub success: bool,
    /// Generated text (present iff success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Error description (present iff failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Tokens reported by the backend
    pub tokens_used: u32,
    /// Wall-clock latency of the network call
    pub latency_ms: u64,
}

impl DispatchResult {
    /// Successful outcome
    #[must_use]
    pub fn ok(content: impl Into<String>, tokens_used: u32, latency_ms: u64) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            error_message: None,
            tokens_used,
            latency_ms,
        }
    }

    /// Failed outcome
    #[must_use]
    pub fn failed(error_message: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            success: false,
            content: None,
            error_message: Some(error_message.into()),
            tokens_used: 0,
            latency_ms,
        }
    }

    /// Generated text, if any
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Error description, if any
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Binds one backend to the usage log
#[derive(Clone)]
pub struct BackendAdapter {
    backend: Arc<dyn TextGenerationBackend>,
    usage: Arc<dyn UsageSink>,
    log_failures: bool,
}

impl std::fmt::Debug for BackendAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendAdapter")
            .field("backend", &self.backend.name())
            .field("kind", &self.backend.kind())
            .field("model", &self.backend.model())
            .field("log_failures", &self.log_failures)
            .finish()
    }
}

impl BackendAdapter {
    /// Create an adapter writing usage entries to `usage`
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerationBackend>, usage: Arc<dyn UsageSink>) -> Self {
        Self {
            backend,
            usage,
            log_failures: false,
        }
    }

    /// Also append a `success = false` entry for failed dispatches
    #[must_use]
    pub fn with_failure_logging(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }

    /// Response family of the wrapped backend
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Name of the wrapped backend
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Model of the wrapped backend
    #[must_use]
    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Send `prompt` and normalize the outcome
    #[instrument(
        skip(self, prompt, module_tag),
        fields(backend = %self.backend.name(), module_tag = %module_tag, prompt_len = prompt.len())
    )]
    pub async fn dispatch(
        &self,
        prompt: &str,
        module_tag: &str,
        session_id: Option<i64>,
        max_tokens: u32,
    ) -> DispatchResult {
        let request = GenerationRequest::new(prompt).with_max_tokens(max_tokens);

        let start = Instant::now();
        let outcome = self.backend.generate(request).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(generation) => {
                debug!(
                    tokens = generation.tokens_used,
                    latency_ms = latency_ms,
                    "Dispatch succeeded"
                );
                self.record(UsageLogEntry {
                    session_id,
                    prompt: prompt.to_string(),
                    response: generation.content.clone(),
                    model_name: generation.model,
                    tokens_used: generation.tokens_used,
                    latency_ms,
                    module_tag: module_tag.to_string(),
                    timestamp: Utc::now(),
                    success: true,
                })
                .await;
                DispatchResult::ok(generation.content, generation.tokens_used, latency_ms)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, latency_ms = latency_ms, "Dispatch failed");
                if self.log_failures {
                    self.record(UsageLogEntry {
                        session_id,
                        prompt: prompt.to_string(),
                        response: message.clone(),
                        model_name: self.backend.model().to_string(),
                        tokens_used: 0,
                        latency_ms,
                        module_tag: module_tag.to_string(),
                        timestamp: Utc::now(),
                        success: false,
                    })
                    .await;
                }
                DispatchResult::failed(message, latency_ms)
            }
        }
    }

    async fn record(&self, entry: UsageLogEntry) {
        if let Err(e) = self.usage.append(entry).await {
            warn!(error = %e, "Failed to append usage log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mock::ScriptedBackend;
    use crate::usage::UsageLog;

    #[tokio::test]
    async fn test_success_is_logged() {
        let backend = Arc::new(ScriptedBackend::chat());
        backend.push_text("resposta", 42);
        let log = Arc::new(UsageLog::new());
        let adapter = BackendAdapter::new(backend.clone(), log.clone());

        let result = adapter.dispatch("pergunta", "multiagent", Some(7), 500).await;

        assert!(result.success);
        assert_eq!(result.content(), Some("resposta"));
        assert!(result.error_message().is_none());
        assert_eq!(result.tokens_used, 42);

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].session_id, Some(7));
        assert_eq!(entries[0].prompt, "pergunta");
        assert_eq!(entries[0].response, "resposta");
        assert_eq!(entries[0].module_tag, "multiagent");
        assert_eq!(entries[0].tokens_used, 42);
        assert!(entries[0].success);

        let requests = backend.requests();
        assert_eq!(requests[0].max_tokens, 500);
    }

    #[tokio::test]
    async fn test_failure_is_not_logged_by_default() {
        let backend = Arc::new(ScriptedBackend::generate());
        backend.push_error(Error::Api {
            status: 429,
            body: "quota".to_string(),
        });
        let log = Arc::new(UsageLog::new());
        let adapter = BackendAdapter::new(backend, log.clone());

        let result = adapter.dispatch("pergunta", "multiagent", None, 1000).await;

        assert!(!result.success);
        assert!(result.content().is_none());
        assert!(result.error_message().unwrap().contains("429"));
        assert_eq!(result.tokens_used, 0);
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_failure_logging_flag() {
        let backend = Arc::new(ScriptedBackend::chat());
        backend.push_error(Error::Timeout(10_000));
        let log = Arc::new(UsageLog::new());
        let adapter = BackendAdapter::new(backend, log.clone()).with_failure_logging(true);

        let result = adapter.dispatch("pergunta", "multiagent", Some(3), 1000).await;

        assert!(!result.success);
        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
        assert!(entries[0].response.contains("timeout"));
    }

    #[test]
    fn test_dispatch_result_serialization_omits_absent_fields() {
        let json = serde_json::to_value(DispatchResult::ok("x", 1, 2)).unwrap();
        assert_eq!(json["content"], "x");
        assert!(json.get("error_message").is_none());

        let json = serde_json::to_value(DispatchResult::failed("boom", 2)).unwrap();
        assert_eq!(json["error_message"], "boom");
        assert!(json.get("content").is_none());
    }
}
