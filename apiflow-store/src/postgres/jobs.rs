use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::store::{to_delta, FailedJob, NewJob, QueuedJob, StoreError};

const JOB_COLUMNS: &str =
    "id, queue, correlation_id, payload, priority, attempts, reserved_at, available_at, created_at";

pub async fn push(pool: &PgPool, job: NewJob) -> Result<QueuedJob, StoreError> {
    let sql = format!(
        r#"
INSERT INTO orchestration_jobs (queue, correlation_id, payload, priority, available_at)
VALUES ($1, $2, $3, $4, $5)
RETURNING {JOB_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, QueuedJob>(&sql)
        .bind(&job.queue)
        .bind(&job.correlation_id)
        .bind(&job.payload)
        .bind(job.priority)
        .bind(job.available_at)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Claims one job. Concurrent workers never see the same row thanks to SKIP LOCKED.
pub async fn reserve(
    pool: &PgPool,
    queue: &str,
    retry_after: Duration,
) -> Result<Option<QueuedJob>, StoreError> {
    let mut tx = pool.begin().await?;
    let stale_before = Utc::now() - to_delta(retry_after);

    let sql = format!(
        r#"
WITH picked AS (
  SELECT id FROM orchestration_jobs
  WHERE queue = $1
    AND available_at <= now()
    AND (reserved_at IS NULL OR reserved_at < $2)
  ORDER BY priority DESC, available_at, id
  FOR UPDATE SKIP LOCKED
  LIMIT 1
)
UPDATE orchestration_jobs j
SET reserved_at = now(), attempts = j.attempts + 1
FROM picked WHERE j.id = picked.id
RETURNING {}
        "#,
        prefixed_columns("j")
    );
    let row = sqlx::query_as::<_, QueuedJob>(&sql)
        .bind(queue)
        .bind(stale_before)
        .fetch_optional(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, job_id: i64) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM orchestration_jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn release(pool: &PgPool, job_id: i64, delay: Duration) -> Result<(), StoreError> {
    let available_at = Utc::now() + to_delta(delay);
    let res = sqlx::query(
        r#"
UPDATE orchestration_jobs SET reserved_at = NULL, available_at = $2
WHERE id = $1
        "#,
    )
    .bind(job_id)
    .bind(available_at)
    .execute(pool)
    .await?;
    if res.rows_affected() == 0 {
        return Err(StoreError::JobNotFound(job_id));
    }
    Ok(())
}

pub async fn fail(pool: &PgPool, job_id: i64, error: &str) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;

    let moved = sqlx::query(
        r#"
WITH gone AS (
  DELETE FROM orchestration_jobs WHERE id = $1
  RETURNING queue, correlation_id, payload
)
INSERT INTO orchestration_failed_jobs (queue, correlation_id, payload, error)
SELECT queue, correlation_id, payload, $2 FROM gone
        "#,
    )
    .bind(job_id)
    .bind(error)
    .execute(&mut *tx)
    .await?;

    if moved.rows_affected() == 0 {
        return Err(StoreError::JobNotFound(job_id));
    }
    tx.commit().await?;
    Ok(())
}

pub async fn pending_jobs(pool: &PgPool, correlation_id: &str) -> Result<Vec<QueuedJob>, StoreError> {
    let sql = format!(
        "SELECT {JOB_COLUMNS} FROM orchestration_jobs WHERE correlation_id = $1 ORDER BY id"
    );
    let rows = sqlx::query_as::<_, QueuedJob>(&sql)
        .bind(correlation_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn failed_jobs(pool: &PgPool, correlation_id: &str) -> Result<Vec<FailedJob>, StoreError> {
    let rows = sqlx::query_as::<_, FailedJob>(
        r#"
SELECT id, queue, correlation_id, payload, error, failed_at
FROM orchestration_failed_jobs
WHERE correlation_id = $1
ORDER BY failed_at DESC
        "#,
    )
    .bind(correlation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn cancel_pending(pool: &PgPool, correlation_id: &str) -> Result<u64, StoreError> {
    let res = sqlx::query(
        "DELETE FROM orchestration_jobs WHERE correlation_id = $1 AND reserved_at IS NULL",
    )
    .bind(correlation_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn prune_failed(
    pool: &PgPool,
    before: DateTime<Utc>,
    dry_run: bool,
) -> Result<u64, StoreError> {
    if dry_run {
        let n: i64 =
            sqlx::query_scalar("SELECT count(*) FROM orchestration_failed_jobs WHERE failed_at < $1")
                .bind(before)
                .fetch_one(pool)
                .await?;
        return Ok(n.max(0) as u64);
    }
    let res = sqlx::query("DELETE FROM orchestration_failed_jobs WHERE failed_at < $1")
        .bind(before)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

fn prefixed_columns(alias: &str) -> String {
    JOB_COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
