//! Usage records and statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single dispatch, as stored in the usage log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    /// Design session the dispatch belongs to (if any)
    pub session_id: Option<i64>,
    /// Prompt sent to the backend
    pub prompt: String,
    /// Generated text, or the error message for a failed dispatch
    pub response: String,
    /// Model name
    pub model_name: String,
    /// Tokens reported by the backend
    pub tokens_used: u32,
    /// Wall-clock latency of the network call
    pub latency_ms: u64,
    /// Caller tag (e.g. "multiagent", "suggestion_extraction")
    pub module_tag: String,
    /// When the dispatch completed
    pub timestamp: DateTime<Utc>,
    /// False only for failure entries (written when failure logging is on)
    pub success: bool,
}

/// Aggregated usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    /// Total requests
    pub total_requests: u64,
    /// Successful requests
    pub successful_requests: u64,
    /// Failed requests
    pub failed_requests: u64,
    /// Total tokens
    pub total_tokens: u64,
    /// Average latency (ms)
    pub avg_latency_ms: f64,
    /// Usage by module tag
    pub by_module: HashMap<String, ModuleStats>,
    /// Request count by model
    pub by_model: HashMap<String, u64>,
}

/// Per-module statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleStats {
    /// Module tag
    pub module_tag: String,
    /// Request count
    pub request_count: u64,
    /// Total tokens
    pub total_tokens: u64,
}

impl UsageStats {
    /// Aggregate a slice of entries
    #[must_use]
    pub fn from_entries(entries: &[UsageLogEntry]) -> Self {
        let mut stats = Self::default();
        let mut latency_sum: u64 = 0;

        for entry in entries {
            stats.total_requests += 1;
            if entry.success {
                stats.successful_requests += 1;
            } else {
                stats.failed_requests += 1;
            }
            stats.total_tokens += u64::from(entry.tokens_used);
            latency_sum += entry.latency_ms;

            let module = stats
                .by_module
                .entry(entry.module_tag.clone())
                .or_insert_with(|| ModuleStats {
                    module_tag: entry.module_tag.clone(),
                    ..Default::default()
                });
            module.request_count += 1;
            module.total_tokens += u64::from(entry.tokens_used);

            *stats.by_model.entry(entry.model_name.clone()).or_insert(0) += 1;
        }

        if stats.total_requests > 0 {
            stats.avg_latency_ms = latency_sum as f64 / stats.total_requests as f64;
        }
        stats
    }
}
