//! Gemini backend implementation

use super::config::GeminiConfig;
use super::types::*;
use crate::backend::{BackendKind, Generation, GenerationRequest, TextGenerationBackend};
use crate::error::{Error, Result};
use reqwest::Client;
use tracing::{debug, instrument};

/// Google Gemini backend
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::NotConfigured(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub(crate) fn build_body<'a>(&self, request: &'a GenerationRequest) -> GeminiRequest<'a> {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature.unwrap_or(self.config.temperature),
            },
        }
    }
}

/// Extract the generated text and token counter from a 2xx body
pub(crate) fn parse_generate_response(body: &str, fallback_model: &str) -> Result<Generation> {
    let response: GeminiResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| Error::InvalidResponse("No text in first candidate".to_string()))?;

    Ok(Generation {
        content,
        tokens_used: response
            .usage_metadata
            .map(|u| u.total_token_count)
            .unwrap_or(0),
        model: response
            .model_version
            .unwrap_or_else(|| fallback_model.to_string()),
    })
}

#[async_trait::async_trait]
impl TextGenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::GenerateContent
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, request), fields(model = %self.config.model, max_tokens = request.max_tokens))]
    async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
        let body = self.build_body(&request);
        let timeout_ms = self.config.timeout.as_millis() as u64;

        debug!("Sending request to Gemini");

        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
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

        parse_generate_response(&text, &self.config.model)
    }
}
