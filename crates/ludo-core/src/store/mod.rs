//! Design session storage
//!
//! [`DesignStore`] is the read side the context aggregator depends on.
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: in-process maps, for tests and dry runs
//! - [`SqliteStore`]: persistent store, also the usage log sink

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::context::{LearningObjective, ReflectionAnswers};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Read access to the artifacts of a design session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// Brainstormed ideas, oldest first
    async fn ideas(&self, session_id: i64) -> Result<Vec<String>>;

    /// Guided-reflection answers, if any were saved
    async fn reflection_answers(&self, session_id: i64) -> Result<Option<ReflectionAnswers>>;

    /// Learning objectives, oldest first
    async fn objectives(&self, session_id: i64) -> Result<Vec<LearningObjective>>;

    /// Canvas notes grouped by section name, oldest first within a section
    async fn canvas_notes(&self, session_id: i64) -> Result<BTreeMap<String, Vec<String>>>;
}
