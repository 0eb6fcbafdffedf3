use std::time::Duration;

use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::store::{to_delta, StoreError};

pub async fn put(pool: &PgPool, key: &str, value: &JsonValue, ttl: Duration) -> Result<(), StoreError> {
    let expires_at = Utc::now() + to_delta(ttl);
    sqlx::query(
        r#"
INSERT INTO orchestration_cache (key, value, expires_at)
VALUES ($1, $2, $3)
ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &PgPool, key: &str) -> Result<Option<JsonValue>, StoreError> {
    let row: Option<(JsonValue,)> =
        sqlx::query_as("SELECT value FROM orchestration_cache WHERE key = $1 AND expires_at > now()")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(v,)| v))
}

pub async fn forget(pool: &PgPool, key: &str) -> Result<bool, StoreError> {
    let res = sqlx::query("DELETE FROM orchestration_cache WHERE key = $1")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn purge_expired(pool: &PgPool, dry_run: bool) -> Result<u64, StoreError> {
    if dry_run {
        let n: i64 = sqlx::query_scalar("SELECT count(*) FROM orchestration_cache WHERE expires_at <= now()")
            .fetch_one(pool)
            .await?;
        return Ok(n.max(0) as u64);
    }
    let res = sqlx::query("DELETE FROM orchestration_cache WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
