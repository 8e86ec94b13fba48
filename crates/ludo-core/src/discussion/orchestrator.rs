//! Discussion orchestrator
//!
//! One discussion is a fixed sequence: build the context, select the panel,
//! consult each agent in turn, synthesize, extract. Agent dispatches run one
//! at a time and a failed agent never aborts the discussion.

use super::extractor::SuggestionExtractor;
use super::synthesizer::Synthesizer;
use super::types::{AgentResponse, DiscussionResult};
use crate::agents::{AgentProfile, AgentRegistry, AgentSelector, PromptBuilder, RoutingTable};
use crate::context::{ContextAggregator, SessionContext};
use crate::error::Result;
use crate::store::DesignStore;
use ludo_llm::{
    BackendAdapter, BackendKind, GeminiBackend, GeminiConfig, GroqBackend, GroqConfig, UsageSink,
    DEFAULT_MAX_TOKENS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Module tag for agent dispatches
pub const AGENT_MODULE_TAG: &str = "multiagent";

/// One adapter per backend family
#[derive(Debug, Clone)]
pub struct Backends {
    /// Chat-completion adapter; also used for synthesis and extraction
    pub chat: BackendAdapter,
    /// Generate-content adapter
    pub generate: BackendAdapter,
}

impl Backends {
    /// Pair two adapters
    pub fn new(chat: BackendAdapter, generate: BackendAdapter) -> Self {
        Self { chat, generate }
    }

    /// Connect to Groq (chat) and Gemini (generate), logging through `usage`
    ///
    /// # Errors
    ///
    /// Fails when an HTTP client cannot be built.
    pub fn connect(
        groq: GroqConfig,
        gemini: GeminiConfig,
        usage: Arc<dyn UsageSink>,
        log_failures: bool,
    ) -> Result<Self> {
        let chat = BackendAdapter::new(Arc::new(GroqBackend::new(groq)?), usage.clone())
            .with_failure_logging(log_failures);
        let generate = BackendAdapter::new(Arc::new(GeminiBackend::new(gemini)?), usage)
            .with_failure_logging(log_failures);
        Ok(Self::new(chat, generate))
    }

    /// Adapter serving `kind`
    #[must_use]
    pub fn for_kind(&self, kind: BackendKind) -> &BackendAdapter {
        match kind {
            BackendKind::ChatCompletion => &self.chat,
            BackendKind::GenerateContent => &self.generate,
        }
    }
}

/// Discussion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionConfig {
    /// Let the coordinator post a framing response before the specialists
    pub coordinator_framing: bool,
    /// Token cap per dispatch
    pub max_tokens: u32,
    /// Seed for the random panel; entropy when absent
    pub selection_seed: Option<u64>,
}

impl Default for DiscussionConfig {
    fn default() -> Self {
        Self {
            coordinator_framing: true,
            max_tokens: DEFAULT_MAX_TOKENS,
            selection_seed: None,
        }
    }
}

/// Runs multi-agent discussions
pub struct Orchestrator {
    aggregator: ContextAggregator,
    registry: AgentRegistry,
    selector: AgentSelector,
    prompts: PromptBuilder,
    backends: Backends,
    synthesizer: Synthesizer,
    extractor: SuggestionExtractor,
    config: DiscussionConfig,
    rng: Mutex<StdRng>,
}

impl Orchestrator {
    /// Create an orchestrator with the default registry and routing table
    pub fn new(store: Arc<dyn DesignStore>, backends: Backends, config: DiscussionConfig) -> Self {
        let registry = AgentRegistry::default();
        let selector = AgentSelector::new(
            RoutingTable::default(),
            registry.specialists().map(|p| p.id),
        );
        let rng = match config.selection_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            aggregator: ContextAggregator::new(store),
            synthesizer: Synthesizer::new(backends.chat.clone(), config.max_tokens),
            extractor: SuggestionExtractor::new(backends.chat.clone(), config.max_tokens),
            registry,
            selector,
            prompts: PromptBuilder::new(),
            backends,
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Replace the routing table
    #[must_use]
    pub fn with_routing_table(mut self, routes: RoutingTable) -> Self {
        self.selector = AgentSelector::new(routes, self.registry.specialists().map(|p| p.id));
        self
    }

    /// Agent catalog
    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Settings in use
    #[must_use]
    pub fn config(&self) -> &DiscussionConfig {
        &self.config
    }

    /// Run a discussion about `message`.
    ///
    /// # Errors
    ///
    /// Fails only when the design store cannot be read. Backend failures are
    /// folded into the result.
    #[instrument(skip(self, message), fields(focus = focus_section.unwrap_or("")))]
    pub async fn discuss(
        &self,
        session_id: i64,
        message: &str,
        focus_section: Option<&str>,
    ) -> Result<DiscussionResult> {
        let context = self.aggregator.build(session_id).await?;

        let selected = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.selector.select(message, focus_section, &mut *rng)
        };
        info!(agents = ?selected, "Panel selected");

        let mut responses = Vec::with_capacity(selected.len());
        for id in selected {
            if id.is_coordinator() && !self.config.coordinator_framing {
                continue;
            }
            let Some(profile) = self.registry.get(id) else {
                warn!(agent = %id, "Selected agent not in registry, skipping");
                continue;
            };
            responses.push(self.consult(profile, &context, message, session_id).await);
        }

        let synthesis = self
            .synthesizer
            .synthesize(&responses, message, Some(session_id))
            .await;
        let suggestions = self.extractor.extract(&synthesis, Some(session_id)).await;

        info!(
            responses = responses.len(),
            failed = responses.iter().filter(|r| !r.success).count(),
            suggestions = suggestions.len(),
            "Discussion complete"
        );

        Ok(DiscussionResult {
            context,
            agents_responses: responses,
            synthesis,
            suggestions,
        })
    }

    async fn consult(
        &self,
        profile: &AgentProfile,
        context: &SessionContext,
        message: &str,
        session_id: i64,
    ) -> AgentResponse {
        let prompt = self.prompts.build(profile, context, message);
        let result = self
            .backends
            .for_kind(profile.backend)
            .dispatch(&prompt, AGENT_MODULE_TAG, Some(session_id), self.config.max_tokens)
            .await;
        debug!(agent = %profile.id, success = result.success, "Agent consulted");
        AgentResponse::from_dispatch(profile.card(), result)
    }
}
