//! Context aggregation from the design store

use super::SessionContext;
use crate::error::Result;
use crate::store::DesignStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Caps applied to each artifact category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Maximum ideas kept
    pub ideas: usize,
    /// Maximum objectives kept
    pub objectives: usize,
    /// Maximum notes kept per canvas section
    pub notes_per_section: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            ideas: 5,
            objectives: 3,
            notes_per_section: 5,
        }
    }
}

/// Builds [`SessionContext`] snapshots
#[derive(Clone)]
pub struct ContextAggregator {
    store: Arc<dyn DesignStore>,
    limits: ContextLimits,
}

impl ContextAggregator {
    /// Create an aggregator with the default caps
    pub fn new(store: Arc<dyn DesignStore>) -> Self {
        Self {
            store,
            limits: ContextLimits::default(),
        }
    }

    /// Override the caps
    #[must_use]
    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Caps in use
    #[must_use]
    pub fn limits(&self) -> ContextLimits {
        self.limits
    }

    /// Read the session's artifacts and compress them into a snapshot.
    ///
    /// Missing data yields empty lists or `None`; only a store failure is an
    /// error.
    #[instrument(skip(self))]
    pub async fn build(&self, session_id: i64) -> Result<SessionContext> {
        let mut ideas = self.store.ideas(session_id).await?;
        ideas.truncate(self.limits.ideas);

        let reflection_answers = self
            .store
            .reflection_answers(session_id)
            .await?
            .filter(|answers| !answers.is_blank());

        let mut objectives = self.store.objectives(session_id).await?;
        objectives.truncate(self.limits.objectives);

        let mut canvas_notes = self.store.canvas_notes(session_id).await?;
        canvas_notes.retain(|_, notes| {
            notes.truncate(self.limits.notes_per_section);
            !notes.is_empty()
        });

        debug!(
            ideas = ideas.len(),
            objectives = objectives.len(),
            sections = canvas_notes.len(),
            has_reflection = reflection_answers.is_some(),
            "Session context built"
        );

        Ok(SessionContext {
            ideas,
            reflection_answers,
            objectives,
            canvas_notes,
        })
    }
}
