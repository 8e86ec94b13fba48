//! Groq - chat-completion style backend
//!
//! Groq serves an OpenAI-compatible API: the prompt goes in as a single user
//! message and the text comes back in `choices[0].message.content`.

use crate::backend::{
    BackendKind, Generation, GenerationRequest, TextGenerationBackend, DEFAULT_TEMPERATURE,
};
use crate::error::{Error, Result};
use crate::util::mask_api_key;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Groq API base URL
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Available Groq models
pub const MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "llama3-70b-8192",
    "gemma2-9b-it",
];

/// Default Groq model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Groq backend configuration
#[derive(Clone)]
pub struct GroqConfig {
    /// API key
    pub api_key: String,
    /// Base URL (overridable for proxies and tests)
    pub base_url: String,
    /// Model
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GroqConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: GROQ_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create configuration from `GROQ_API_KEY` / `GROQ_MODEL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| Error::NotConfigured("GROQ_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GROQ_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u32,
}

/// Groq backend
pub struct GroqBackend {
    client: Client,
    config: GroqConfig,
}

impl GroqBackend {
    /// Create a new Groq backend
    pub fn new(config: GroqConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::NotConfigured(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GroqConfig::from_env()?)
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &GroqConfig {
        &self.config
    }

    fn build_body<'a>(&'a self, request: &'a GenerationRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature.unwrap_or(self.config.temperature),
            top_p: 1.0,
            stream: false,
        }
    }
}

/// Extract the generated text and token counter from a 2xx body
pub(crate) fn parse_chat_response(body: &str, fallback_model: &str) -> Result<Generation> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::InvalidResponse("No choices in response".to_string()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| Error::InvalidResponse("No content in first choice".to_string()))?;

    Ok(Generation {
        content,
        tokens_used: response.usage.map(|u| u.total_tokens).unwrap_or(0),
        model: response
            .model
            .unwrap_or_else(|| fallback_model.to_string()),
    })
}

#[async_trait::async_trait]
impl TextGenerationBackend for GroqBackend {
    fn name(&self) -> &str {
        "groq"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::ChatCompletion
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, request), fields(model = %self.config.model, max_tokens = request.max_tokens))]
    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        let body = self.build_body(&request);
        let timeout_ms = self.config.timeout.as_millis() as u64;

        debug!("Sending request to Groq");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::from_transport(e, timeout_ms))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::from_transport(e, timeout_ms))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_chat_response(&text, &self.config.model)
    }
}
