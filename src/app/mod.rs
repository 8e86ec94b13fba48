//! Application wiring
//!
//! Opens the design store, connects the two backend families and builds the
//! orchestrator from the loaded configuration.

pub mod config;
pub mod loader;

pub use config::AppConfig;
pub use loader::{load_config, ApiKeys};

use anyhow::{Context, Result};
use ludo_core::{Backends, Orchestrator, SqliteStore, StageAssistant};
use ludo_llm::UsageSink;
use std::sync::Arc;
use tracing::{info, warn};

/// Open the SQLite design store named by `config`
pub async fn open_store(config: &AppConfig) -> Result<Arc<SqliteStore>> {
    let path = config.database.resolve_path()?;
    let store = SqliteStore::new(&path)
        .await
        .with_context(|| format!("Failed to open design store at {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Store, backends and settings of one CLI invocation
pub struct App {
    pub config: AppConfig,
    pub store: Arc<SqliteStore>,
    pub backends: Backends,
}

impl App {
    /// Load configuration and connect everything
    pub async fn from_env() -> Result<Self> {
        let config = load_config()?;
        Self::open(config, ApiKeys::from_env()).await
    }

    /// Connect with an explicit configuration and keys
    pub async fn open(config: AppConfig, keys: ApiKeys) -> Result<Self> {
        let store = open_store(&config).await?;

        if keys.groq.is_none() {
            warn!("GROQ_API_KEY not set; chat-completion dispatches will fail");
        }
        if keys.gemini.is_none() {
            warn!("GEMINI_API_KEY not set; generate-content dispatches will fail");
        }

        let usage: Arc<dyn UsageSink> = store.clone();
        let backends = Backends::connect(
            config.llm.groq_config(keys.groq.as_deref().unwrap_or_default()),
            config.llm.gemini_config(keys.gemini.as_deref().unwrap_or_default()),
            usage,
            config.llm.log_failed_dispatches,
        )
        .context("Failed to initialize LLM backends")?;

        info!(
            groq_model = %config.llm.groq.model,
            gemini_model = %config.llm.gemini.model,
            "Ludo initialized"
        );

        Ok(Self {
            config,
            store,
            backends,
        })
    }

    /// Discussion orchestrator with the configured routes
    pub fn orchestrator(&self) -> Result<Orchestrator> {
        let routes = self.config.discussion.routing_table()?;
        let settings = self
            .config
            .discussion
            .discussion_config(self.config.llm.max_tokens);
        Ok(
            Orchestrator::new(self.store.clone(), self.backends.clone(), settings)
                .with_routing_table(routes),
        )
    }

    /// Single-prompt helpers on the chat-completion backend
    pub fn stage_assistant(&self) -> StageAssistant {
        StageAssistant::new(self.backends.chat.clone(), self.config.llm.max_tokens)
    }
}
