//! Discussion - multi-agent orchestration
//!
//! # Module Structure
//!
//! - `types`: `Suggestion`, `AgentResponse` and `DiscussionResult`
//! - `orchestrator`: `Orchestrator::discuss` and the `Backends` pair
//! - `synthesizer`: coordinator synthesis with its fixed fallback
//! - `extractor`: JSON suggestion extraction with `ParseOutcome`
//!
//! # Flow
//!
//! ```text
//! message ──► ContextAggregator ──► AgentSelector ──► [PromptBuilder ─► BackendAdapter] × N
//!                                                              │
//!                       DiscussionResult ◄── SuggestionExtractor ◄── Synthesizer
//! ```

mod extractor;
mod orchestrator;
mod synthesizer;
mod types;

#[cfg(test)]
mod tests;

pub use extractor::{
    ParseOutcome, SuggestionExtractor, EXTRACTION_MODULE_TAG, FALLBACK_JUSTIFICATION,
    FALLBACK_SECTION,
};
pub use orchestrator::{Backends, DiscussionConfig, Orchestrator, AGENT_MODULE_TAG};
pub use synthesizer::{Synthesizer, SYNTHESIS_FALLBACK, SYNTHESIS_MODULE_TAG};
pub use types::{AgentResponse, DiscussionResult, Suggestion, SuggestionAction};
