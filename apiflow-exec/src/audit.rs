use std::sync::Arc;

use apiflow_core::types::{StepResult, StepSpec};
use apiflow_core::CorrelationId;
use apiflow_store::{AuditLog, NewRequestLog};
use serde_json::Value as JsonValue;

/// Best-effort writer for the request audit log. Write failures are logged and dropped.
#[derive(Clone, Default)]
pub struct AuditRecorder {
    log: Option<Arc<dyn AuditLog>>,
}

impl AuditRecorder {
    pub fn new(log: Arc<dyn AuditLog>) -> Self {
        Self { log: Some(log) }
    }

    pub fn disabled() -> Self {
        Self { log: None }
    }

    pub async fn record(
        &self,
        orchestration_id: &CorrelationId,
        user: &str,
        step: &StepSpec,
        result: &StepResult,
    ) {
        let Some(log) = &self.log else {
            return;
        };
        let entry = NewRequestLog {
            orchestration_id: orchestration_id.to_string(),
            caller: user.to_string(),
            url: result.url.clone(),
            method: result.method.as_str().to_string(),
            request_payload: step.body.clone().unwrap_or(JsonValue::Null),
            response_payload: result.data.clone(),
            status_code: i32::from(result.status_code),
            duration_ms: result.duration_ms,
            success: result.success,
        };
        if let Err(e) = log.append(entry).await {
            tracing::warn!(
                orchestration_id = %orchestration_id,
                step_index = result.index,
                error = %e,
                "failed to write request audit log"
            );
        }
    }
}
