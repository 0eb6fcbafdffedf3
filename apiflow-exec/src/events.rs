use apiflow_core::types::{ConditionType, HttpMethod, RunSummary};
use apiflow_core::CorrelationId;
use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        orchestration_id: CorrelationId,
        user: String,
        steps: usize,
    },
    StepSkipped {
        orchestration_id: CorrelationId,
        index: usize,
        condition: ConditionType,
        api_index: i64,
    },
    StepStarted {
        orchestration_id: CorrelationId,
        index: usize,
        method: HttpMethod,
        url: String,
    },
    StepFinished {
        orchestration_id: CorrelationId,
        index: usize,
        success: bool,
        status_code: u16,
        duration_ms: f64,
    },
    RunAborted {
        orchestration_id: CorrelationId,
        index: usize,
    },
    RunFinished {
        orchestration_id: CorrelationId,
        summary: RunSummary,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::RunStarted { .. } => "run.started",
            Event::StepSkipped { .. } => "step.skipped",
            Event::StepStarted { .. } => "step.started",
            Event::StepFinished { .. } => "step.finished",
            Event::RunAborted { .. } => "run.aborted",
            Event::RunFinished { .. } => "run.finished",
        }
    }

    pub fn orchestration_id(&self) -> &CorrelationId {
        match self {
            Event::RunStarted { orchestration_id, .. }
            | Event::StepSkipped { orchestration_id, .. }
            | Event::StepStarted { orchestration_id, .. }
            | Event::StepFinished { orchestration_id, .. }
            | Event::RunAborted { orchestration_id, .. }
            | Event::RunFinished { orchestration_id, .. } => orchestration_id,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        let id = self.orchestration_id().as_str();
        let kind = self.kind();
        match self {
            Event::RunStarted { user, steps, .. } => {
                json!({ "type": kind, "orchestration_id": id, "user": user, "steps": steps })
            }
            Event::StepSkipped { index, condition, api_index, .. } => {
                json!({ "type": kind, "orchestration_id": id, "index": index, "condition": condition, "api_index": api_index })
            }
            Event::StepStarted { index, method, url, .. } => {
                json!({ "type": kind, "orchestration_id": id, "index": index, "method": method.as_str(), "url": url })
            }
            Event::StepFinished { index, success, status_code, duration_ms, .. } => {
                json!({ "type": kind, "orchestration_id": id, "index": index, "success": success, "status_code": status_code, "duration_ms": duration_ms })
            }
            Event::RunAborted { index, .. } => {
                json!({ "type": kind, "orchestration_id": id, "index": index })
            }
            Event::RunFinished { summary, .. } => {
                json!({ "type": kind, "orchestration_id": id, "summary": summary })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        match &event {
            Event::RunStarted { orchestration_id, user, steps } => {
                tracing::info!(orchestration_id = %orchestration_id, user = %user, steps, "run started");
            }
            Event::StepSkipped { orchestration_id, index, condition, api_index } => {
                tracing::info!(
                    orchestration_id = %orchestration_id,
                    step_index = index,
                    condition = ?condition,
                    api_index,
                    "step skipped: condition not met"
                );
            }
            Event::StepStarted { orchestration_id, index, method, url } => {
                tracing::debug!(orchestration_id = %orchestration_id, step_index = index, method = %method, url = %url, "step started");
            }
            Event::StepFinished { orchestration_id, index, success, status_code, duration_ms } => {
                if *success {
                    tracing::debug!(orchestration_id = %orchestration_id, step_index = index, status_code, duration_ms, "step finished");
                } else {
                    tracing::warn!(orchestration_id = %orchestration_id, step_index = index, status_code, duration_ms, "step failed");
                }
            }
            Event::RunAborted { orchestration_id, index } => {
                tracing::info!(orchestration_id = %orchestration_id, step_index = index, "stopping orchestration due to failure");
            }
            Event::RunFinished { orchestration_id, summary } => {
                tracing::info!(
                    orchestration_id = %orchestration_id,
                    total = summary.total_requests,
                    successful = summary.successful_requests,
                    success_rate = summary.success_rate,
                    "run finished"
                );
            }
        }
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
