//! Usage sinks
//!
//! Persistence of usage entries is delegated to the storage collaborator
//! through [`UsageSink`]. [`UsageLog`] keeps entries in memory and is what the
//! tests and the storage-less CLI paths use.

use super::record::{UsageLogEntry, UsageStats};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Maximum entries to keep in memory by default
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Append-only destination for usage entries
#[async_trait]
pub trait UsageSink: Send + Sync {
    /// Append one entry
    async fn append(&self, entry: UsageLogEntry) -> Result<()>;
}

/// Sink that drops every entry
#[derive(Debug, Default, Clone, Copy)]
pub struct NullUsageSink;

#[async_trait]
impl UsageSink for NullUsageSink {
    async fn append(&self, _entry: UsageLogEntry) -> Result<()> {
        Ok(())
    }
}

/// In-memory usage log
#[derive(Debug)]
pub struct UsageLog {
    entries: RwLock<Vec<UsageLogEntry>>,
    max_entries: usize,
}

impl Default for UsageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }

    /// Create with custom max entries
    #[must_use]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Snapshot of all entries, oldest first
    pub async fn entries(&self) -> Vec<UsageLogEntry> {
        self.entries.read().await.clone()
    }

    /// Entries of one session, oldest first
    pub async fn entries_for_session(&self, session_id: i64) -> Vec<UsageLogEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.session_id == Some(session_id))
            .cloned()
            .collect()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the log is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Aggregate statistics over the stored entries
    pub async fn stats(&self) -> UsageStats {
        UsageStats::from_entries(&self.entries.read().await)
    }
}

#[async_trait]
impl UsageSink for UsageLog {
    async fn append(&self, entry: UsageLogEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.push(entry);

        if entries.len() > self.max_entries {
            let drain_count = entries.len() - self.max_entries;
            entries.drain(0..drain_count);
        }
        Ok(())
    }
}
