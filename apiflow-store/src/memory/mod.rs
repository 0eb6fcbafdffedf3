//! Process-local backend. Backs synchronous runs when no database is configured, and tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use crate::store::{
    to_delta, AuditLog, FailedJob, JobQueue, NewJob, NewRequestLog, OrchestrationActivity,
    QueuedJob, RequestLog, ResultCache, StoreError,
};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    jobs: Vec<QueuedJob>,
    failed: Vec<FailedJob>,
    cache: HashMap<String, CacheEntry>,
    logs: Vec<RequestLog>,
}

struct CacheEntry {
    value: JsonValue,
    /// `None` when the ttl overflows `Instant`.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl JobQueue for MemoryStore {
    async fn push(&self, job: NewJob) -> Result<QueuedJob, StoreError> {
        let mut inner = self.inner.lock().await;
        let queued = QueuedJob {
            id: inner.next_id(),
            queue: job.queue,
            correlation_id: job.correlation_id,
            payload: job.payload,
            priority: job.priority,
            attempts: 0,
            reserved_at: None,
            available_at: job.available_at,
            created_at: Utc::now(),
        };
        inner.jobs.push(queued.clone());
        Ok(queued)
    }

    async fn reserve(&self, queue: &str, retry_after: Duration) -> Result<Option<QueuedJob>, StoreError> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();
        let stale_before = now - to_delta(retry_after);

        let picked = inner
            .jobs
            .iter_mut()
            .filter(|j| j.queue == queue && j.available_at <= now)
            .filter(|j| j.reserved_at.map_or(true, |at| at < stale_before))
            .min_by(|a, b| {
                b.priority
                    .cmp(&a.priority)
                    .then(a.available_at.cmp(&b.available_at))
                    .then(a.id.cmp(&b.id))
            });

        Ok(picked.map(|job| {
            job.reserved_at = Some(now);
            job.attempts += 1;
            job.clone()
        }))
    }

    async fn delete(&self, job_id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.jobs.retain(|j| j.id != job_id);
        Ok(())
    }

    async fn release(&self, job_id: i64, delay: Duration) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let job = inner
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or(StoreError::JobNotFound(job_id))?;
        job.reserved_at = None;
        job.available_at = Utc::now() + to_delta(delay);
        Ok(())
    }

    async fn fail(&self, job_id: i64, error: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let pos = inner
            .jobs
            .iter()
            .position(|j| j.id == job_id)
            .ok_or(StoreError::JobNotFound(job_id))?;
        let job = inner.jobs.remove(pos);
        let id = inner.next_id();
        inner.failed.push(FailedJob {
            id,
            queue: job.queue,
            correlation_id: job.correlation_id,
            payload: job.payload,
            error: error.to_string(),
            failed_at: Utc::now(),
        });
        Ok(())
    }

    async fn pending_jobs(&self, correlation_id: &str) -> Result<Vec<QueuedJob>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .jobs
            .iter()
            .filter(|j| j.correlation_id == correlation_id)
            .cloned()
            .collect())
    }

    async fn failed_jobs(&self, correlation_id: &str) -> Result<Vec<FailedJob>, StoreError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<FailedJob> = inner
            .failed
            .iter()
            .filter(|j| j.correlation_id == correlation_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.failed_at.cmp(&a.failed_at));
        Ok(rows)
    }

    async fn cancel_pending(&self, correlation_id: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.jobs.len();
        inner
            .jobs
            .retain(|j| !(j.correlation_id == correlation_id && j.reserved_at.is_none()));
        Ok((before - inner.jobs.len()) as u64)
    }

    async fn prune_failed(&self, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let n = inner.failed.iter().filter(|j| j.failed_at < before).count() as u64;
        if !dry_run {
            inner.failed.retain(|j| j.failed_at >= before);
        }
        Ok(n)
    }
}

#[async_trait::async_trait]
impl ResultCache for MemoryStore {
    async fn put(&self, key: &str, value: JsonValue, ttl: Duration) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let expires_at = Instant::now().checked_add(ttl);
        inner
            .cache
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        match inner.cache.get(key) {
            Some(entry) if entry.is_expired(now) => {
                inner.cache.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn forget(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.cache.remove(key).is_some())
    }

    async fn purge_expired(&self, dry_run: bool) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();
        let n = inner.cache.values().filter(|e| e.is_expired(now)).count() as u64;
        if !dry_run {
            inner.cache.retain(|_, e| !e.is_expired(now));
        }
        Ok(n)
    }
}

#[async_trait::async_trait]
impl AuditLog for MemoryStore {
    async fn append(&self, entry: NewRequestLog) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id();
        inner.logs.push(RequestLog {
            id,
            orchestration_id: entry.orchestration_id,
            caller: entry.caller,
            url: entry.url,
            method: entry.method,
            request_payload: entry.request_payload,
            response_payload: entry.response_payload,
            status_code: entry.status_code,
            duration_ms: entry.duration_ms,
            success: entry.success,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn entries_for(&self, orchestration_id: &str) -> Result<Vec<RequestLog>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .logs
            .iter()
            .filter(|l| l.orchestration_id == orchestration_id)
            .cloned()
            .collect())
    }

    async fn recent_orchestrations(&self, limit: i64) -> Result<Vec<OrchestrationActivity>, StoreError> {
        let inner = self.inner.lock().await;
        let mut seen: HashMap<&str, OrchestrationActivity> = HashMap::new();
        for log in &inner.logs {
            seen.entry(log.orchestration_id.as_str())
                .and_modify(|a| {
                    if log.created_at < a.started_at {
                        a.started_at = log.created_at;
                    }
                })
                .or_insert_with(|| OrchestrationActivity {
                    orchestration_id: log.orchestration_id.clone(),
                    caller: log.caller.clone(),
                    started_at: log.created_at,
                });
        }
        let mut rows: Vec<OrchestrationActivity> = seen.into_values().collect();
        rows.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn prune(&self, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let n = inner.logs.iter().filter(|l| l.created_at < before).count() as u64;
        if !dry_run {
            inner.logs.retain(|l| l.created_at >= before);
        }
        Ok(n)
    }
}
