use std::sync::Arc;
use std::time::Duration;

use apiflow_core::types::{ExecutionMode, OrchestrationRecord, OrchestrationRequest};
use apiflow_core::{validate_request, CorrelationId, ValidationError};
use apiflow_store::{JobQueue, NewJob, StoreError};
use chrono::{DateTime, Utc};

use crate::config::ExecutorConfig;
use crate::engine::Engine;
use crate::job::JobPayload;
use crate::results::ResultStore;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("no queue configured for asynchronous runs")]
    QueueUnavailable,
    #[error("failed to enqueue orchestration: {0}")]
    Queue(StoreError),
    #[error("failed to encode job payload: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Acknowledgement {
    pub orchestration_id: CorrelationId,
    pub status: &'static str,
    pub queue: String,
    pub priority: i16,
    pub available_at: DateTime<Utc>,
    /// Upper bound: start time plus every step's timeout.
    pub estimated_completion_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Completed(OrchestrationRecord),
    Queued(Acknowledgement),
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusReport {
    Completed {
        result: OrchestrationRecord,
    },
    Processing {
        queue: String,
        attempts: i32,
        reserved: bool,
        created_at: DateTime<Utc>,
        available_at: DateTime<Utc>,
    },
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
    NotFound {},
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CancelOutcome {
    pub orchestration_id: CorrelationId,
    pub cancelled: bool,
    pub removed: u64,
}

/// Entry point for submissions and lifecycle queries.
pub struct Coordinator {
    engine: Arc<Engine>,
    results: ResultStore,
    queue: Option<Arc<dyn JobQueue>>,
    config: ExecutorConfig,
}

impl Coordinator {
    pub fn new(engine: Arc<Engine>, results: ResultStore, config: ExecutorConfig) -> Self {
        Self {
            engine,
            results,
            queue: None,
            config,
        }
    }

    pub fn with_queue(mut self, queue: Arc<dyn JobQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Validates and either runs the request inline or enqueues it, depending on `options.mode`.
    pub async fn submit(&self, request: OrchestrationRequest) -> Result<SubmitOutcome, SubmitError> {
        validate_request(&request)?;
        let orchestration_id = CorrelationId::generate();

        match request.options.mode {
            ExecutionMode::Sync => {
                let record = self.engine.run(&orchestration_id, &request).await;
                if let Err(e) = self.results.put(&record).await {
                    tracing::warn!(orchestration_id = %orchestration_id, error = %e, "failed to cache orchestration result");
                }
                Ok(SubmitOutcome::Completed(record))
            }
            ExecutionMode::Async => self.enqueue(orchestration_id, request).await.map(SubmitOutcome::Queued),
        }
    }

    async fn enqueue(
        &self,
        orchestration_id: CorrelationId,
        request: OrchestrationRequest,
    ) -> Result<Acknowledgement, SubmitError> {
        let queue = self.queue.as_ref().ok_or(SubmitError::QueueUnavailable)?;

        let now = Utc::now();
        let available_at = i64::try_from(request.options.delay_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let budget: Duration = request
            .steps
            .iter()
            .map(|s| s.timeout.map(Duration::from_secs).unwrap_or(self.engine.default_timeout()))
            .sum();
        let estimated_completion_at = chrono::Duration::from_std(budget)
            .ok()
            .and_then(|d| available_at.checked_add_signed(d))
            .unwrap_or(available_at);
        let priority = request.options.priority.weight();

        let payload = JobPayload {
            orchestration_id: orchestration_id.clone(),
            request,
        };
        let payload = serde_json::to_value(&payload).map_err(|e| SubmitError::Encode(e.to_string()))?;

        queue
            .push(NewJob {
                queue: self.config.queue.clone(),
                correlation_id: orchestration_id.to_string(),
                payload,
                priority,
                available_at,
            })
            .await
            .map_err(SubmitError::Queue)?;

        tracing::info!(
            orchestration_id = %orchestration_id,
            queue = %self.config.queue,
            priority,
            "orchestration queued"
        );

        Ok(Acknowledgement {
            orchestration_id,
            status: "queued",
            queue: self.config.queue.clone(),
            priority,
            available_at,
            estimated_completion_at,
        })
    }

    /// Completed record from the cache, else pending or failed queue state, else not found.
    pub async fn status(&self, orchestration_id: &CorrelationId) -> Result<StatusReport, StoreError> {
        if let Some(result) = self.results.get(orchestration_id).await? {
            return Ok(StatusReport::Completed { result });
        }

        let Some(queue) = &self.queue else {
            return Ok(StatusReport::NotFound {});
        };

        if let Some(job) = queue.pending_jobs(orchestration_id.as_str()).await?.into_iter().next() {
            return Ok(StatusReport::Processing {
                reserved: job.is_reserved(),
                queue: job.queue,
                attempts: job.attempts,
                created_at: job.created_at,
                available_at: job.available_at,
            });
        }

        if let Some(failed) = queue.failed_jobs(orchestration_id.as_str()).await?.into_iter().next() {
            return Ok(StatusReport::Failed {
                error: failed.error,
                failed_at: failed.failed_at,
            });
        }

        Ok(StatusReport::NotFound {})
    }

    /// Removes a run that no worker has picked up yet. Started or finished runs are untouched.
    pub async fn cancel(&self, orchestration_id: &CorrelationId) -> Result<CancelOutcome, StoreError> {
        let removed = match &self.queue {
            Some(queue) => queue.cancel_pending(orchestration_id.as_str()).await?,
            None => 0,
        };
        if removed > 0 {
            tracing::info!(orchestration_id = %orchestration_id, removed, "orchestration cancelled");
        }
        Ok(CancelOutcome {
            orchestration_id: orchestration_id.clone(),
            cancelled: removed > 0,
            removed,
        })
    }
}
