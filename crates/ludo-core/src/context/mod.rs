//! Session context
//!
//! A [`SessionContext`] is the bounded snapshot of one design session that
//! grounds every agent prompt. It is rebuilt by [`ContextAggregator`] on each
//! discussion and never mutated afterwards.

mod aggregator;

pub use aggregator::{ContextAggregator, ContextLimits};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answers to the guided-reflection questions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionAnswers {
    /// Educational problem the game addresses
    #[serde(default)]
    pub problem: String,
    /// Why the chosen approach fits the problem
    #[serde(default)]
    pub justification: String,
    /// Expected learning impact
    #[serde(default)]
    pub impact: String,
    /// What motivates students to play
    #[serde(default)]
    pub motivation: String,
}

impl ReflectionAnswers {
    /// True when every answer is blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.problem,
            &self.justification,
            &self.impact,
            &self.motivation,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// A learning objective tagged with its taxonomy level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningObjective {
    /// Objective statement, starting with an infinitive verb
    pub text: String,
    /// Taxonomy level (Lembrar, Compreender, ... Criar)
    pub level: String,
}

impl LearningObjective {
    /// Create an objective
    pub fn new(text: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: level.into(),
        }
    }
}

/// Read-only snapshot of a design session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Brainstormed ideas, oldest first
    pub ideas: Vec<String>,
    /// Guided-reflection answers, if the session has any
    pub reflection_answers: Option<ReflectionAnswers>,
    /// Learning objectives, oldest first
    pub objectives: Vec<LearningObjective>,
    /// Canvas notes keyed by section name
    pub canvas_notes: BTreeMap<String, Vec<String>>,
}

impl SessionContext {
    /// True when the session has nothing to ground a prompt with
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
            && self.reflection_answers.is_none()
            && self.objectives.is_empty()
            && self.canvas_notes.values().all(Vec::is_empty)
    }
}
