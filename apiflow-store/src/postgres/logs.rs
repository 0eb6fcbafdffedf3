use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::store::{NewRequestLog, OrchestrationActivity, RequestLog, StoreError};

pub async fn append(pool: &PgPool, entry: NewRequestLog) -> Result<(), StoreError> {
    sqlx::query(
        r#"
INSERT INTO request_logs
  (orchestration_id, caller, url, method, request_payload, response_payload,
   status_code, duration_ms, success)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(&entry.orchestration_id)
    .bind(&entry.caller)
    .bind(&entry.url)
    .bind(&entry.method)
    .bind(&entry.request_payload)
    .bind(&entry.response_payload)
    .bind(entry.status_code)
    .bind(entry.duration_ms)
    .bind(entry.success)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn entries_for(pool: &PgPool, orchestration_id: &str) -> Result<Vec<RequestLog>, StoreError> {
    let rows = sqlx::query_as::<_, RequestLog>(
        r#"
SELECT id, orchestration_id, caller, url, method, request_payload, response_payload,
       status_code, duration_ms, success, created_at
FROM request_logs
WHERE orchestration_id = $1
ORDER BY id
        "#,
    )
    .bind(orchestration_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn recent_orchestrations(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<OrchestrationActivity>, StoreError> {
    let rows = sqlx::query_as::<_, OrchestrationActivity>(
        r#"
SELECT orchestration_id, caller, MIN(created_at) AS started_at
FROM request_logs
GROUP BY orchestration_id, caller
ORDER BY started_at DESC
LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn prune(pool: &PgPool, before: DateTime<Utc>, dry_run: bool) -> Result<u64, StoreError> {
    if dry_run {
        let n: i64 = sqlx::query_scalar("SELECT count(*) FROM request_logs WHERE created_at < $1")
            .bind(before)
            .fetch_one(pool)
            .await?;
        return Ok(n.max(0) as u64);
    }
    let res = sqlx::query("DELETE FROM request_logs WHERE created_at < $1")
        .bind(before)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
