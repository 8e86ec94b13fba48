//! Discussion result types

use crate::agents::AgentCard;
use crate::context::SessionContext;
use ludo_llm::DispatchResult;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// What a suggestion does to its canvas section
///
/// Model output is taken as given: the three known verbs are matched
/// case-insensitively and anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SuggestionAction {
    /// Add new content
    #[default]
    Add,
    /// Change existing content
    Modify,
    /// Remove existing content
    Remove,
    /// Any other verb the model used
    Other(String),
}

impl SuggestionAction {
    /// Wire form of the action
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SuggestionAction::Add => "add",
            SuggestionAction::Modify => "modify",
            SuggestionAction::Remove => "remove",
            SuggestionAction::Other(verb) => verb,
        }
    }
}

impl From<&str> for SuggestionAction {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "add" => SuggestionAction::Add,
            "modify" => SuggestionAction::Modify,
            "remove" => SuggestionAction::Remove,
            _ => SuggestionAction::Other(value.to_string()),
        }
    }
}

impl fmt::Display for SuggestionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SuggestionAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SuggestionAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => SuggestionAction::default(),
            Some(Value::String(verb)) => SuggestionAction::from(verb.as_str()),
            Some(other) => SuggestionAction::Other(other.to_string()),
        })
    }
}

/// Strings from model output: `null` or a missing field is "", other
/// scalars keep their JSON text
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    })
}

/// A structured edit to the design canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Canvas section name
    #[serde(default, deserialize_with = "lenient_string")]
    pub section: String,
    /// Kind of edit
    #[serde(default)]
    pub action: SuggestionAction,
    /// Proposed content
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    /// Why the edit is proposed
    #[serde(default, deserialize_with = "lenient_string")]
    pub justification: String,
}

/// One agent's contribution to a discussion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The agent that answered
    pub agent: AgentCard,
    /// Generated text, or the error text when the dispatch failed
    pub response: String,
    /// Whether the backend answered
    pub success: bool,
    /// Tokens reported by the backend
    pub tokens_used: u32,
    /// Dispatch latency
    pub latency_ms: u64,
}

impl AgentResponse {
    /// Fold a dispatch outcome into a response
    pub fn from_dispatch(agent: AgentCard, result: DispatchResult) -> Self {
        let response = match (result.content, result.error_message) {
            (Some(content), _) if result.success => content,
            (_, Some(error)) => format!("Erro ao obter resposta: {error}"),
            _ => "Erro ao obter resposta: resposta vazia".to_string(),
        };
        Self {
            agent,
            response,
            success: result.success,
            tokens_used: result.tokens_used,
            latency_ms: result.latency_ms,
        }
    }
}

/// Outcome of a multi-agent discussion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionResult {
    /// Snapshot the prompts were grounded on
    pub context: SessionContext,
    /// Responses in selection order
    pub agents_responses: Vec<AgentResponse>,
    /// Coordinator's synthesis
    pub synthesis: String,
    /// Structured suggestions, never empty
    pub suggestions: Vec<Suggestion>,
}

impl DiscussionResult {
    /// Tokens spent on the agent responses
    #[must_use]
    pub fn agent_tokens(&self) -> u32 {
        self.agents_responses.iter().map(|r| r.tokens_used).sum()
    }

    /// Number of agents whose dispatch failed
    #[must_use]
    pub fn failed_agents(&self) -> usize {
        self.agents_responses.iter().filter(|r| !r.success).count()
    }
}
