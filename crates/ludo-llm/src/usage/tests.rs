//! Tests for usage module

use super::*;
use chrono::Utc;

fn entry(session_id: Option<i64>, module_tag: &str, tokens: u32, latency: u64) -> UsageLogEntry {
    UsageLogEntry {
        session_id,
        prompt: "prompt".to_string(),
        response: "response".to_string(),
        model_name: "llama-3.3-70b-versatile".to_string(),
        tokens_used: tokens,
        latency_ms: latency,
        module_tag: module_tag.to_string(),
        timestamp: Utc::now(),
        success: true,
    }
}

#[tokio::test]
async fn test_append_and_filter_by_session() {
    let log = UsageLog::new();
    log.append(entry(Some(1), "multiagent", 10, 100)).await.unwrap();
    log.append(entry(Some(2), "multiagent", 20, 200)).await.unwrap();
    log.append(entry(None, "brainstorm", 30, 300)).await.unwrap();

    assert_eq!(log.len().await, 3);
    let session_one = log.entries_for_session(1).await;
    assert_eq!(session_one.len(), 1);
    assert_eq!(session_one[0].tokens_used, 10);
}

#[tokio::test]
async fn test_max_entries_drops_oldest() {
    let log = UsageLog::new().with_max_entries(2);
    for i in 0..5 {
        log.append(entry(Some(i), "multiagent", 1, 1)).await.unwrap();
    }

    let entries = log.entries().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].session_id, Some(3));
    assert_eq!(entries[1].session_id, Some(4));
}

#[tokio::test]
async fn test_stats_aggregation() {
    let log = UsageLog::new();
    log.append(entry(Some(1), "multiagent", 100, 100)).await.unwrap();
    log.append(entry(Some(1), "multiagent", 50, 300)).await.unwrap();
    let mut failed = entry(Some(1), "multiagent_synthesis", 0, 200);
    failed.success = false;
    log.append(failed).await.unwrap();

    let stats = log.stats().await;
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.successful_requests, 2);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.total_tokens, 150);
    assert!((stats.avg_latency_ms - 200.0).abs() < f64::EPSILON);
    assert_eq!(stats.by_module["multiagent"].request_count, 2);
    assert_eq!(stats.by_module["multiagent"].total_tokens, 150);
    assert_eq!(stats.by_model["llama-3.3-70b-versatile"], 3);
}

#[test]
fn test_empty_stats() {
    let stats = UsageStats::from_entries(&[]);
    assert_eq!(stats.total_requests, 0);
    assert_eq!(stats.avg_latency_ms, 0.0);
}
