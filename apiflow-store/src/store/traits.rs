use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::store::types::*;

/// Deferred units of work, ordered by priority then availability.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn push(&self, job: NewJob) -> Result<QueuedJob, StoreError>;

    /// Reserve the next available job on `queue`, incrementing its attempt count.
    ///
    /// Reservations older than `retry_after` are treated as abandoned (worker died) and may be
    /// reserved again.
    async fn reserve(&self, queue: &str, retry_after: Duration) -> Result<Option<QueuedJob>, StoreError>;

    /// Remove a finished job.
    async fn delete(&self, job_id: i64) -> Result<(), StoreError>;

    /// Return a reserved job to the queue, available again after `delay`.
    async fn release(&self, job_id: i64, delay: Duration) -> Result<(), StoreError>;

    /// Move a job to the failed list with the final error.
    async fn fail(&self, job_id: i64, error: &str) -> Result<(), StoreError>;

    /// Jobs (reserved or not) carrying `correlation_id`.
    async fn pending_jobs(&self, correlation_id: &str) -> Result<Vec<QueuedJob>, StoreError>;

    async fn failed_jobs(&self, correlation_id: &str) -> Result<Vec<FailedJob>, StoreError>;

    /// Delete not-yet-reserved jobs carrying `correlation_id`. Returns the number removed.
    async fn cancel_pending(&self, correlation_id: &str) -> Result<u64, StoreError>;

    /// Delete (or with `dry_run`, count) failed jobs older than `before`.
    async fn prune_failed(&self, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError>;
}

/// Key/value store with per-entry time to live.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn put(&self, key: &str, value: JsonValue, ttl: Duration) -> Result<(), StoreError>;

    /// Expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError>;

    async fn forget(&self, key: &str) -> Result<bool, StoreError>;

    async fn purge_expired(&self, dry_run: bool) -> Result<u64, StoreError>;
}

/// Append-only record of every HTTP call made on behalf of a caller.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: NewRequestLog) -> Result<(), StoreError>;

    async fn entries_for(&self, orchestration_id: &str) -> Result<Vec<RequestLog>, StoreError>;

    /// Most recently started orchestrations, newest first.
    async fn recent_orchestrations(&self, limit: i64) -> Result<Vec<OrchestrationActivity>, StoreError>;

    /// Delete (or with `dry_run`, count) entries older than `before`.
    async fn prune(&self, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("job not found: {0}")]
    JobNotFound(i64),
    #[error("store error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Other(e.to_string())
    }
}
