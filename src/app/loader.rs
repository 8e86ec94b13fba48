//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("LUDO_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        // prefix_separator("_") lets LUDO_LLM__MAX_TOKENS work with a single _ after the prefix.
        .add_source(
            Environment::with_prefix("LUDO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    apply_model_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// `GROQ_MODEL` / `GEMINI_MODEL` win over the file values
fn apply_model_overrides(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(model) = var("GROQ_MODEL").filter(|m| !m.trim().is_empty()) {
        config.llm.groq.model = model;
    }
    if let Some(model) = var("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
        config.llm.gemini.model = model;
    }
}

/// API keys from `GROQ_API_KEY` / `GEMINI_API_KEY`
#[derive(Clone, Default)]
pub struct ApiKeys {
    pub groq: Option<String>,
    pub gemini: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|k| !k.trim().is_empty());
        Self {
            groq: read("GROQ_API_KEY"),
            gemini: read("GEMINI_API_KEY"),
        }
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = |key: &Option<String>| key.as_deref().map(ludo_llm::util::mask_api_key);
        f.debug_struct("ApiKeys")
            .field("groq", &masked(&self.groq))
            .field("gemini", &masked(&self.gemini))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded() -> AppConfig {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config = embedded();
        assert!(config.database.path.is_empty());
        assert_eq!(config.llm.max_tokens, 1000);
        assert!(!config.llm.log_failed_dispatches);
        assert_eq!(config.llm.groq.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.llm.groq.timeout_ms, 10_000);
        assert!(config.discussion.coordinator_framing);
        assert!(config.discussion.selection_seed.is_none());
        assert!(config.discussion.extra_keywords.is_empty());
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(
                r#"
                [llm]
                max_tokens = 400

                [discussion]
                coordinator_framing = false
                selection_seed = 3

                [[discussion.extra_sections]]
                section = "Acessibilidade"
                agents = ["engagement"]
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.llm.max_tokens, 400);
        assert_eq!(config.llm.groq.model, "llama-3.3-70b-versatile");
        assert!(!config.discussion.coordinator_framing);
        assert_eq!(config.discussion.selection_seed, Some(3));
        assert_eq!(config.discussion.extra_sections[0].section, "Acessibilidade");
    }

    #[test]
    fn test_model_overrides() {
        let mut config = embedded();
        apply_model_overrides(&mut config, |name| match name {
            "GROQ_MODEL" => Some("llama-3.1-8b-instant".to_string()),
            "GEMINI_MODEL" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.llm.groq.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_api_keys_debug_is_masked() {
        let keys = ApiKeys {
            groq: Some("gsk_1234567890abcdef".to_string()),
            gemini: None,
        };
        let debug = format!("{:?}", keys);
        assert!(debug.contains("gsk_...cdef"));
        assert!(!debug.contains("1234567890"));
    }
}
