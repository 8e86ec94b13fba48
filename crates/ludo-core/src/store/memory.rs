//! In-memory design store

use super::DesignStore;
use crate::context::{LearningObjective, ReflectionAnswers};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone)]
struct SessionData {
    ideas: Vec<String>,
    reflection_answers: Option<ReflectionAnswers>,
    objectives: Vec<LearningObjective>,
    canvas_notes: BTreeMap<String, Vec<String>>,
}

/// Design store backed by process memory
///
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<i64, SessionData>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an idea
    pub async fn add_idea(&self, session_id: i64, text: impl Into<String>) {
        self.sessions
            .write()
            .await
            .entry(session_id)
            .or_default()
            .ideas
            .push(text.into());
    }

    /// Replace the reflection answers
    pub async fn save_reflection_answers(&self, session_id: i64, answers: ReflectionAnswers) {
        self.sessions
            .write()
            .await
            .entry(session_id)
            .or_default()
            .reflection_answers = Some(answers);
    }

    /// Append a learning objective
    pub async fn add_objective(&self, session_id: i64, objective: LearningObjective) {
        self.sessions
            .write()
            .await
            .entry(session_id)
            .or_default()
            .objectives
            .push(objective);
    }

    /// Append a note to a canvas section
    pub async fn add_canvas_note(
        &self,
        session_id: i64,
        section: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.sessions
            .write()
            .await
            .entry(session_id)
            .or_default()
            .canvas_notes
            .entry(section.into())
            .or_default()
            .push(text.into());
    }

    async fn read<T>(&self, session_id: i64, f: impl FnOnce(&SessionData) -> T) -> Option<T> {
        self.sessions.read().await.get(&session_id).map(f)
    }
}

#[async_trait]
impl DesignStore for MemoryStore {
    async fn ideas(&self, session_id: i64) -> Result<Vec<String>> {
        Ok(self
            .read(session_id, |s| s.ideas.clone())
            .await
            .unwrap_or_default())
    }

    async fn reflection_answers(&self, session_id: i64) -> Result<Option<ReflectionAnswers>> {
        Ok(self
            .read(session_id, |s| s.reflection_answers.clone())
            .await
            .flatten())
    }

    async fn objectives(&self, session_id: i64) -> Result<Vec<LearningObjective>> {
        Ok(self
            .read(session_id, |s| s.objectives.clone())
            .await
            .unwrap_or_default())
    }

    async fn canvas_notes(&self, session_id: i64) -> Result<BTreeMap<String, Vec<String>>> {
        Ok(self
            .read(session_id, |s| s.canvas_notes.clone())
            .await
            .unwrap_or_default())
    }
}
