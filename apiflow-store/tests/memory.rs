use std::time::Duration;

use apiflow_store::{
    AuditLog, JobQueue, MemoryStore, NewJob, NewRequestLog, ResultCache, StoreError,
};
use chrono::Utc;
use serde_json::json;

fn job(queue: &str, correlation_id: &str, priority: i16) -> NewJob {
    NewJob {
        queue: queue.to_string(),
        correlation_id: correlation_id.to_string(),
        payload: json!({ "id": correlation_id }),
        priority,
        available_at: Utc::now(),
    }
}

fn log(orchestration_id: &str) -> NewRequestLog {
    NewRequestLog {
        orchestration_id: orchestration_id.to_string(),
        caller: "acme".to_string(),
        url: "https://x.test/a".to_string(),
        method: "GET".to_string(),
        request_payload: json!(null),
        response_payload: json!({ "ok": true }),
        status_code: 200,
        duration_ms: 12.5,
        success: true,
    }
}

#[tokio::test]
async fn reserve_prefers_priority_then_age() {
    let store = MemoryStore::new();
    store.push(job("q", "low", 1)).await.unwrap();
    store.push(job("q", "normal", 5)).await.unwrap();
    store.push(job("q", "high", 10)).await.unwrap();
    store.push(job("other", "elsewhere", 10)).await.unwrap();

    let retry_after = Duration::from_secs(90);
    let order: Vec<String> = [
        store.reserve("q", retry_after).await.unwrap().unwrap(),
        store.reserve("q", retry_after).await.unwrap().unwrap(),
        store.reserve("q", retry_after).await.unwrap().unwrap(),
    ]
    .into_iter()
    .map(|j| j.correlation_id)
    .collect();

    assert_eq!(order, vec!["high", "normal", "low"]);
    assert!(store.reserve("q", retry_after).await.unwrap().is_none());
}

#[tokio::test]
async fn delayed_jobs_are_not_reserved_early() {
    let store = MemoryStore::new();
    let mut delayed = job("q", "later", 5);
    delayed.available_at = Utc::now() + chrono::Duration::seconds(60);
    store.push(delayed).await.unwrap();

    assert!(store.reserve("q", Duration::from_secs(90)).await.unwrap().is_none());
}

#[tokio::test]
async fn stale_reservation_can_be_reserved_again() {
    let store = MemoryStore::new();
    store.push(job("q", "c1", 5)).await.unwrap();

    let first = store.reserve("q", Duration::from_secs(90)).await.unwrap().unwrap();
    assert_eq!(first.attempts, 1);
    assert!(store.reserve("q", Duration::from_secs(90)).await.unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(20)).await;
    let again = store.reserve("q", Duration::from_millis(1)).await.unwrap().unwrap();
    assert_eq!(again.id, first.id);
    assert_eq!(again.attempts, 2);
}

#[tokio::test]
async fn release_and_fail_move_jobs() {
    let store = MemoryStore::new();
    let pushed = store.push(job("q", "c1", 5)).await.unwrap();
    store.reserve("q", Duration::from_secs(90)).await.unwrap().unwrap();

    store.release(pushed.id, Duration::ZERO).await.unwrap();
    let pending = store.pending_jobs("c1").await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(!pending[0].is_reserved());

    store.fail(pushed.id, "boom").await.unwrap();
    assert!(store.pending_jobs("c1").await.unwrap().is_empty());
    let failed = store.failed_jobs("c1").await.unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].error, "boom");

    let err = store.release(pushed.id, Duration::ZERO).await.unwrap_err();
    assert!(matches!(err, StoreError::JobNotFound(id) if id == pushed.id));
}

#[tokio::test]
async fn cancel_pending_skips_reserved_jobs() {
    let store = MemoryStore::new();
    store.push(job("q", "c1", 5)).await.unwrap();
    store.push(job("q", "c1", 5)).await.unwrap();
    store.reserve("q", Duration::from_secs(90)).await.unwrap().unwrap();

    assert_eq!(store.cancel_pending("c1").await.unwrap(), 1);
    let left = store.pending_jobs("c1").await.unwrap();
    assert_eq!(left.len(), 1);
    assert!(left[0].is_reserved());
}

#[tokio::test]
async fn prune_failed_honours_dry_run() {
    let store = MemoryStore::new();
    let pushed = store.push(job("q", "c1", 5)).await.unwrap();
    store.fail(pushed.id, "boom").await.unwrap();

    let cutoff = Utc::now() + chrono::Duration::seconds(1);
    assert_eq!(store.prune_failed(cutoff, true).await.unwrap(), 1);
    assert_eq!(store.failed_jobs("c1").await.unwrap().len(), 1);
    assert_eq!(store.prune_failed(cutoff, false).await.unwrap(), 1);
    assert!(store.failed_jobs("c1").await.unwrap().is_empty());
}

#[tokio::test]
async fn cache_entries_expire() {
    let store = MemoryStore::new();
    store
        .put("short", json!({ "v": 1 }), Duration::from_millis(10))
        .await
        .unwrap();
    store
        .put("long", json!({ "v": 2 }), Duration::from_secs(3600))
        .await
        .unwrap();

    assert_eq!(store.get("short").await.unwrap(), Some(json!({ "v": 1 })));
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(store.purge_expired(true).await.unwrap(), 1);
    assert_eq!(store.get("short").await.unwrap(), None);
    assert_eq!(store.get("long").await.unwrap(), Some(json!({ "v": 2 })));

    assert!(store.forget("long").await.unwrap());
    assert!(!store.forget("long").await.unwrap());
}

#[tokio::test]
async fn audit_log_groups_recent_orchestrations() {
    let store = MemoryStore::new();
    store.append(log("orch_a")).await.unwrap();
    store.append(log("orch_a")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.append(log("orch_b")).await.unwrap();

    assert_eq!(store.entries_for("orch_a").await.unwrap().len(), 2);

    let recent = store.recent_orchestrations(10).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|r| r.orchestration_id.as_str()).collect();
    assert_eq!(ids, vec!["orch_b", "orch_a"]);

    assert_eq!(store.recent_orchestrations(1).await.unwrap().len(), 1);

    let cutoff = Utc::now() + chrono::Duration::seconds(1);
    assert_eq!(store.prune(cutoff, false).await.unwrap(), 3);
    assert!(store.recent_orchestrations(10).await.unwrap().is_empty());
}
