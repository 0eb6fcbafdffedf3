use apiflow_core::types::OrchestrationRequest;
use apiflow_core::CorrelationId;

/// Payload of a queued run: everything a worker needs to execute it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JobPayload {
    pub orchestration_id: CorrelationId,
    pub request: OrchestrationRequest,
}
