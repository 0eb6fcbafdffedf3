use std::sync::Arc;
use std::time::Duration;

use apiflow_core::types::OrchestrationRecord;
use apiflow_core::CorrelationId;
use apiflow_store::{ResultCache, StoreError};

pub const RESULT_KEY_PREFIX: &str = "orchestration_result_";

pub fn result_key(orchestration_id: &CorrelationId) -> String {
    format!("{RESULT_KEY_PREFIX}{orchestration_id}")
}

/// Finalized records in the result cache, keyed by correlation id.
#[derive(Clone)]
pub struct ResultStore {
    cache: Arc<dyn ResultCache>,
    ttl: Duration,
}

impl ResultStore {
    pub fn new(cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    pub async fn put(&self, record: &OrchestrationRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record).map_err(|e| StoreError::Other(e.to_string()))?;
        self.cache
            .put(&result_key(&record.orchestration_id), value, self.ttl)
            .await
    }

    pub async fn get(&self, orchestration_id: &CorrelationId) -> Result<Option<OrchestrationRecord>, StoreError> {
        let Some(value) = self.cache.get(&result_key(orchestration_id)).await? else {
            return Ok(None);
        };
        let record = serde_json::from_value(value)
            .map_err(|e| StoreError::Other(format!("corrupt cached result for {orchestration_id}: {e}")))?;
        Ok(Some(record))
    }
}
