//! Ludo Core - multi-agent discussion engine
//!
//! This crate provides the decision logic of the Ludo design assistant:
//! - Context: bounded `SessionContext` snapshots of a design session
//! - Store: the `DesignStore` collaborator with memory and SQLite backends
//! - Agents: expert catalog, panel selection and prompt rendering
//! - Discussion: the orchestrator, synthesis and suggestion extraction
//! - Stages: single-prompt helpers for the earlier pipeline stages

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agents;
pub mod context;
pub mod discussion;
pub mod error;
pub mod json;
pub mod stages;
pub mod store;

pub use agents::{AgentId, AgentProfile, AgentRegistry, AgentSelector, PromptBuilder, RoutingTable};
pub use context::{ContextAggregator, LearningObjective, ReflectionAnswers, SessionContext};
pub use discussion::{
    Backends, DiscussionConfig, DiscussionResult, Orchestrator, Suggestion, SuggestionAction,
};
pub use error::{Error, Result};
pub use stages::StageAssistant;
pub use store::{DesignStore, MemoryStore, SqliteStore};
