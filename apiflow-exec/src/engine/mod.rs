//! Sequential per-run step execution.

mod state;
mod step;

use std::sync::Arc;
use std::time::{Duration, Instant};

use apiflow_core::types::{OrchestrationRecord, OrchestrationRequest};
use apiflow_core::CorrelationId;

use crate::audit::AuditRecorder;
use crate::conditions::unmet_condition;
use crate::events::{Event, EventSink, NoOpEventSink};
use crate::http::HttpClient;
use crate::transform::{transform_request, transform_response};

use state::{Flow, RunMachine};

/// Runs one orchestration's steps in order. Shared by the synchronous path and the queue worker.
pub struct Engine {
    http: Arc<dyn HttpClient>,
    audit: AuditRecorder,
    events: Arc<dyn EventSink>,
    default_timeout: Duration,
}

impl Engine {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            audit: AuditRecorder::disabled(),
            events: Arc::new(NoOpEventSink),
            default_timeout: Duration::from_secs(apiflow_core::types::DEFAULT_STEP_TIMEOUT_SECS),
        }
    }

    pub fn with_audit(mut self, audit: AuditRecorder) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Executes every step whose conditions hold and returns the finalized record.
    ///
    /// Step failures are embedded in the record; this never returns an error.
    pub async fn run(&self, orchestration_id: &CorrelationId, request: &OrchestrationRequest) -> OrchestrationRecord {
        let mut run = RunMachine::new(request.options.stop_on_failure);
        run.start();

        self.events
            .emit(Event::RunStarted {
                orchestration_id: orchestration_id.clone(),
                user: request.user.clone(),
                steps: request.steps.len(),
            })
            .await;

        for (index, spec) in request.steps.iter().enumerate() {
            if let Some(cond) = unmet_condition(spec, run.results()) {
                self.events
                    .emit(Event::StepSkipped {
                        orchestration_id: orchestration_id.clone(),
                        index,
                        condition: cond.r#type,
                        api_index: cond.api_index,
                    })
                    .await;
                continue;
            }

            let started = Instant::now();
            let step = transform_request(spec, run.results());
            let timeout = step.timeout.map(Duration::from_secs).unwrap_or(self.default_timeout);

            self.events
                .emit(Event::StepStarted {
                    orchestration_id: orchestration_id.clone(),
                    index,
                    method: step.method,
                    url: step.url.clone(),
                })
                .await;

            let raw = step::execute_step(self.http.as_ref(), index, &step, timeout, started).await;
            let result = transform_response(raw, &step.response_transformations);

            self.audit.record(orchestration_id, &request.user, &step, &result).await;
            self.events
                .emit(Event::StepFinished {
                    orchestration_id: orchestration_id.clone(),
                    index,
                    success: result.success,
                    status_code: result.status_code,
                    duration_ms: result.duration_ms,
                })
                .await;

            if run.record(result) == Flow::Stop {
                self.events
                    .emit(Event::RunAborted {
                        orchestration_id: orchestration_id.clone(),
                        index,
                    })
                    .await;
                break;
            }
        }

        tracing::trace!(orchestration_id = %orchestration_id, state = run.state().as_str(), "step loop done");
        let record = run.finish(orchestration_id.clone(), request.user.clone());
        self.events
            .emit(Event::RunFinished {
                orchestration_id: orchestration_id.clone(),
                summary: record.summary.clone(),
            })
            .await;
        record
    }
}
