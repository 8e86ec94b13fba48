//! Backend - text generation capability shared by both services
//!
//! Two response shapes are supported: the chat-completion style
//! (OpenAI-compatible, served by Groq) and the generate-content style
//! (Google Gemini). Callers never branch on the service; they hold a
//! [`BackendKind`] and resolve it to a backend once.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum tokens per request
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature used by both backends
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Which family of text-generation service a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// `{model, messages, ...}` → `choices[0].message.content`
    ChatCompletion,
    /// `{contents, generationConfig}` → `candidates[0].content.parts[0].text`
    GenerateContent,
}

impl BackendKind {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatCompletion => "chat_completion",
            Self::GenerateContent => "generate_content",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-prompt generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Prompt text, sent as one user turn
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature override (backend default when `None`)
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a request with the default token budget
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }

    /// Set max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Normalized backend output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Generated text
    pub content: String,
    /// Total tokens reported by the service (0 when absent)
    pub tokens_used: u32,
    /// Model that produced the text
    pub model: String,
}

/// Capability implemented by every text-generation service
#[async_trait::async_trait]
pub trait TextGenerationBackend: Send + Sync {
    /// Backend name used in logs (e.g. "groq")
    fn name(&self) -> &str;

    /// Response family this backend speaks
    fn kind(&self) -> BackendKind;

    /// Model requests are sent to
    fn model(&self) -> &str;

    /// Send one request and return the normalized output
    async fn generate(&self, request: GenerationRequest) -> Result<Generation>;
}
