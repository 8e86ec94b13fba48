//! Scripted backend for testing
//!
//! Returns queued outcomes in order and records every request it receives.
//! When the queue is empty it answers with a fixed default text.

use crate::backend::{BackendKind, Generation, GenerationRequest, TextGenerationBackend};
use crate::error::{Error, Result};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Text returned when no outcome is queued
pub const DEFAULT_MOCK_TEXT: &str = "mock response";

/// A backend that replays queued outcomes
pub struct ScriptedBackend {
    kind: BackendKind,
    outcomes: Arc<Mutex<VecDeque<Result<Generation>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    always_fail: Option<u16>,
}

impl ScriptedBackend {
    /// Create a scripted backend of the given kind
    #[must_use]
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            always_fail: None,
        }
    }

    /// Chat-completion style double
    #[must_use]
    pub fn chat() -> Self {
        Self::new(BackendKind::ChatCompletion)
    }

    /// Generate-content style double
    #[must_use]
    pub fn generate() -> Self {
        Self::new(BackendKind::GenerateContent)
    }

    /// Answer every request with the given HTTP status, ignoring the queue
    #[must_use]
    pub fn failing(kind: BackendKind, status: u16) -> Self {
        Self {
            always_fail: Some(status),
            ..Self::new(kind)
        }
    }

    /// Queue a successful text
    pub fn push_text(&self, content: impl Into<String>, tokens_used: u32) {
        self.lock_outcomes().push_back(Ok(Generation {
            content: content.into(),
            tokens_used,
            model: self.model().to_string(),
        }));
    }

    /// Queue an error
    pub fn push_error(&self, error: Error) {
        self.lock_outcomes().push_back(Err(error));
    }

    /// Requests received so far
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Prompts received so far
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.prompt).collect()
    }

    fn lock_outcomes(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Generation>>> {
        self.outcomes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl TextGenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn model(&self) -> &str {
        match self.kind {
            BackendKind::ChatCompletion => "mock-chat",
            BackendKind::GenerateContent => "mock-generate",
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        if let Some(status) = self.always_fail {
            return Err(Error::Api {
                status,
                body: "{\"error\":\"scripted failure\"}".to_string(),
            });
        }

        match self.lock_outcomes().pop_front() {
            Some(outcome) => outcome,
            None => Ok(Generation {
                content: DEFAULT_MOCK_TEXT.to_string(),
                tokens_used: 0,
                model: self.model().to_string(),
            }),
        }
    }
}
