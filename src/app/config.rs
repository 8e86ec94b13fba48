//! Application configuration types

use anyhow::{Context, Result};
use ludo_core::{AgentId, DiscussionConfig, RoutingTable, SqliteStore};
use ludo_llm::{GeminiConfig, GroqConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub discussion: DiscussionSettings,
}

/// Design store location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Empty means the default location
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    /// Path of the SQLite file
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if self.path.trim().is_empty() {
            SqliteStore::default_path().context("Failed to resolve default database path")
        } else {
            Ok(PathBuf::from(&self.path))
        }
    }
}

/// Backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub log_failed_dispatches: bool,
    #[serde(default = "default_groq")]
    pub groq: BackendSettings,
    #[serde(default = "default_gemini")]
    pub gemini: BackendSettings,
}

fn default_max_tokens() -> u32 {
    ludo_llm::DEFAULT_MAX_TOKENS
}

fn default_groq() -> BackendSettings {
    BackendSettings {
        model: ludo_llm::groq::DEFAULT_MODEL.to_string(),
        base_url: ludo_llm::groq::GROQ_API_BASE.to_string(),
        timeout_ms: default_timeout_ms(),
    }
}

fn default_gemini() -> BackendSettings {
    BackendSettings {
        model: ludo_llm::gemini::DEFAULT_MODEL.to_string(),
        base_url: ludo_llm::gemini::DEFAULT_BASE_URL.to_string(),
        timeout_ms: default_timeout_ms(),
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            log_failed_dispatches: false,
            groq: default_groq(),
            gemini: default_gemini(),
        }
    }
}

impl LlmConfig {
    /// Groq client settings for `api_key`
    pub fn groq_config(&self, api_key: &str) -> GroqConfig {
        GroqConfig::new(api_key)
            .with_model(&self.groq.model)
            .with_base_url(&self.groq.base_url)
            .with_timeout(self.groq.timeout())
    }

    /// Gemini client settings for `api_key`
    pub fn gemini_config(&self, api_key: &str) -> GeminiConfig {
        GeminiConfig::new(api_key)
            .with_model(&self.gemini.model)
            .with_base_url(&self.gemini.base_url)
            .with_timeout(self.gemini.timeout())
    }
}

/// One HTTP backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    pub model: String,
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Discussion behaviour and routing extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionSettings {
    #[serde(default = "default_coordinator_framing")]
    pub coordinator_framing: bool,
    #[serde(default)]
    pub selection_seed: Option<u64>,
    #[serde(default)]
    pub extra_keywords: Vec<KeywordRoute>,
    #[serde(default)]
    pub extra_sections: Vec<SectionRoute>,
}

fn default_coordinator_framing() -> bool {
    true
}

impl Default for DiscussionSettings {
    fn default() -> Self {
        Self {
            coordinator_framing: default_coordinator_framing(),
            selection_seed: None,
            extra_keywords: Vec::new(),
            extra_sections: Vec::new(),
        }
    }
}

/// Extra keyword route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRoute {
    pub keyword: String,
    pub agents: Vec<String>,
}

/// Extra focus-section route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRoute {
    pub section: String,
    pub agents: Vec<String>,
}

impl DiscussionSettings {
    /// Orchestrator settings
    pub fn discussion_config(&self, max_tokens: u32) -> DiscussionConfig {
        DiscussionConfig {
            coordinator_framing: self.coordinator_framing,
            max_tokens,
            selection_seed: self.selection_seed,
        }
    }

    /// Built-in routes merged with the configured ones
    pub fn routing_table(&self) -> Result<RoutingTable> {
        let mut table = RoutingTable::default();
        for route in &self.extra_keywords {
            let agents = parse_agents(&route.agents)
                .with_context(|| format!("Invalid route for keyword '{}'", route.keyword))?;
            table = table.with_keyword(&route.keyword, agents);
        }
        for route in &self.extra_sections {
            let agents = parse_agents(&route.agents)
                .with_context(|| format!("Invalid route for section '{}'", route.section))?;
            table = table.with_section(route.section.clone(), agents);
        }
        Ok(table)
    }
}

fn parse_agents(names: &[String]) -> Result<Vec<AgentId>> {
    names
        .iter()
        .map(|name| name.parse::<AgentId>().map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_resolution() {
        if let Ok(path) = DatabaseConfig::default().resolve_path() {
            assert!(path.ends_with(".ludo/ludo.db"));
        }

        let config = DatabaseConfig {
            path: "/tmp/custom.db".to_string(),
        };
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_backend_configs_carry_settings() {
        let mut llm = LlmConfig::default();
        llm.groq.timeout_ms = 2_500;
        llm.gemini.model = "gemini-2.5-flash".to_string();

        let groq = llm.groq_config("gsk_test_key_123456");
        assert_eq!(groq.timeout, Duration::from_millis(2_500));
        assert_eq!(groq.model, ludo_llm::groq::DEFAULT_MODEL);

        let gemini = llm.gemini_config("AIza_test_1234567890");
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert_eq!(gemini.api_key, "AIza_test_1234567890");
    }

    #[test]
    fn test_routing_table_merges_extras() {
        let settings = DiscussionSettings {
            extra_keywords: vec![KeywordRoute {
                keyword: "Puzzle".to_string(),
                agents: vec!["mechanics".to_string(), "Engagement".to_string()],
            }],
            extra_sections: vec![SectionRoute {
                section: "Acessibilidade".to_string(),
                agents: vec!["pedagogy".to_string()],
            }],
            ..Default::default()
        };

        let table = tokio_test::assert_ok!(settings.routing_table());
        let matched: Vec<AgentId> = table.keyword_matches("um puzzle de lógica").collect();
        assert_eq!(matched, vec![AgentId::Mechanics, AgentId::Engagement]);
        assert_eq!(table.section_agents("Acessibilidade"), &[AgentId::Pedagogy]);
        assert!(table.keywords().count() > 1);
    }

    #[test]
    fn test_unknown_agent_in_route_is_rejected() {
        let settings = DiscussionSettings {
            extra_keywords: vec![KeywordRoute {
                keyword: "som".to_string(),
                agents: vec!["sound".to_string()],
            }],
            ..Default::default()
        };

        let err = settings.routing_table().unwrap_err();
        assert!(err.to_string().contains("keyword 'som'"));
    }

    #[test]
    fn test_discussion_config_mapping() {
        let settings = DiscussionSettings {
            coordinator_framing: false,
            selection_seed: Some(9),
            ..Default::default()
        };
        let config = settings.discussion_config(640);
        assert!(!config.coordinator_framing);
        assert_eq!(config.max_tokens, 640);
        assert_eq!(config.selection_seed, Some(9));
    }
}
