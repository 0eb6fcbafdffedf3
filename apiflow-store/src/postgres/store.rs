use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::store::{
    AuditLog, FailedJob, JobQueue, NewJob, NewRequestLog, OrchestrationActivity, QueuedJob,
    RequestLog, ResultCache, StoreError,
};

use super::cache;
use super::jobs;
use super::logs;

/// Shared backend: one pool serving the queue, the cache, and the audit log.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl JobQueue for PostgresStore {
    async fn push(&self, job: NewJob) -> Result<QueuedJob, StoreError> {
        jobs::push(&self.pool, job).await
    }

    async fn reserve(&self, queue: &str, retry_after: Duration) -> Result<Option<QueuedJob>, StoreError> {
        jobs::reserve(&self.pool, queue, retry_after).await
    }

    async fn delete(&self, job_id: i64) -> Result<(), StoreError> {
        jobs::delete(&self.pool, job_id).await
    }

    async fn release(&self, job_id: i64, delay: Duration) -> Result<(), StoreError> {
        jobs::release(&self.pool, job_id, delay).await
    }

    async fn fail(&self, job_id: i64, error: &str) -> Result<(), StoreError> {
        jobs::fail(&self.pool, job_id, error).await
    }

    async fn pending_jobs(&self, correlation_id: &str) -> Result<Vec<QueuedJob>, StoreError> {
        jobs::pending_jobs(&self.pool, correlation_id).await
    }

    async fn failed_jobs(&self, correlation_id: &str) -> Result<Vec<FailedJob>, StoreError> {
        jobs::failed_jobs(&self.pool, correlation_id).await
    }

    async fn cancel_pending(&self, correlation_id: &str) -> Result<u64, StoreError> {
        jobs::cancel_pending(&self.pool, correlation_id).await
    }

    async fn prune_failed(&self, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError> {
        jobs::prune_failed(&self.pool, before, dry_run).await
    }
}

#[async_trait::async_trait]
impl ResultCache for PostgresStore {
    async fn put(&self, key: &str, value: JsonValue, ttl: Duration) -> Result<(), StoreError> {
        cache::put(&self.pool, key, &value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<JsonValue>, StoreError> {
        cache::get(&self.pool, key).await
    }

    async fn forget(&self, key: &str) -> Result<bool, StoreError> {
        cache::forget(&self.pool, key).await
    }

    async fn purge_expired(&self, dry_run: bool) -> Result<u64, StoreError> {
        cache::purge_expired(&self.pool, dry_run).await
    }
}

#[async_trait::async_trait]
impl AuditLog for PostgresStore {
    async fn append(&self, entry: NewRequestLog) -> Result<(), StoreError> {
        logs::append(&self.pool, entry).await
    }

    async fn entries_for(&self, orchestration_id: &str) -> Result<Vec<RequestLog>, StoreError> {
        logs::entries_for(&self.pool, orchestration_id).await
    }

    async fn recent_orchestrations(&self, limit: i64) -> Result<Vec<OrchestrationActivity>, StoreError> {
        logs::recent_orchestrations(&self.pool, limit).await
    }

    async fn prune(&self, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError> {
        logs::prune(&self.pool, before, dry_run).await
    }
}
