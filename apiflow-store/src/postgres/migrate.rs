use sqlx::PgPool;

use crate::store::StoreError;

/// Applies the bundled orchestration schema. Already-applied versions are skipped.
///
/// Returns how many migrations the schema consists of.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, StoreError> {
    let migrator = sqlx::migrate!("postgres/migrations");
    migrator
        .run(pool)
        .await
        .map_err(|e| StoreError::Other(format!("schema migration failed: {e}")))?;
    Ok(migrator.iter().count())
}
