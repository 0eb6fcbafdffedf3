//! Background pool that drains the orchestration queue.

use std::future::Future;
use std::sync::Arc;

use apiflow_core::CorrelationId;
use apiflow_store::{JobQueue, QueuedJob, StoreError};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::config::ExecutorConfig;
use crate::engine::Engine;
use crate::job::JobPayload;
use crate::results::ResultStore;
use crate::retry::backoff_delay;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("worker concurrency limiter closed")]
    SemaphoreClosed,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to one reserved job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed {
        orchestration_id: CorrelationId,
    },
    /// Back on the queue after `delay`.
    Released {
        orchestration_id: CorrelationId,
        attempts: i32,
        delay: std::time::Duration,
    },
    /// Moved to the failed list.
    Failed {
        orchestration_id: CorrelationId,
        error: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub completed: usize,
    pub released: usize,
    pub failed: usize,
}

impl WorkerStats {
    fn count(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Completed { .. } => self.completed += 1,
            JobOutcome::Released { .. } => self.released += 1,
            JobOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

#[derive(Clone)]
pub struct QueueWorker {
    queue: Arc<dyn JobQueue>,
    results: ResultStore,
    engine: Arc<Engine>,
    config: ExecutorConfig,
}

impl QueueWorker {
    pub fn new(queue: Arc<dyn JobQueue>, results: ResultStore, engine: Arc<Engine>, config: ExecutorConfig) -> Self {
        let limit = config.effective_job_timeout();
        if config.job_timeout.is_some_and(|t| t > limit) {
            tracing::warn!(
                requested_ms = config.job_timeout.map_or(0, |t| t.as_millis() as u64),
                limit_ms = limit.as_millis() as u64,
                retry_after_ms = config.retry_after.as_millis() as u64,
                "job timeout exceeds the reservation window; clamping"
            );
        }
        Self {
            queue,
            results,
            engine,
            config,
        }
    }

    /// Reserve and process at most one job.
    pub async fn run_once(&self) -> Result<Option<JobOutcome>, WorkerError> {
        let Some(job) = self.queue.reserve(&self.config.queue, self.config.retry_after).await? else {
            return Ok(None);
        };
        Ok(Some(self.process(job).await))
    }

    /// Processes jobs with up to `concurrency` runs in flight until `shutdown` resolves, then
    /// waits for in-flight runs to finish.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<WorkerStats, WorkerError>
    where
        F: Future<Output = ()>,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut in_flight: Vec<JoinHandle<JobOutcome>> = Vec::new();
        let mut stats = WorkerStats::default();
        tokio::pin!(shutdown);

        tracing::info!(
            queue = %self.config.queue,
            concurrency = self.config.concurrency,
            max_attempts = self.config.max_attempts,
            "queue worker started"
        );

        loop {
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = semaphore.clone().acquire_owned() => permit.map_err(|_| WorkerError::SemaphoreClosed)?,
            };

            collect_finished(&mut in_flight, &mut stats).await;

            let reserved = self.queue.reserve(&self.config.queue, self.config.retry_after).await;
            let job = match reserved {
                Ok(Some(job)) => job,
                Ok(None) => {
                    drop(permit);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => continue,
                    }
                }
                Err(e) => {
                    drop(permit);
                    tracing::error!(error = %e, "failed to reserve job");
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => continue,
                    }
                }
            };

            tracing::debug!(
                job_id = job.id,
                orchestration_id = %job.correlation_id,
                attempts = job.attempts,
                "job reserved"
            );

            let worker = self.clone();
            in_flight.push(tokio::spawn(async move {
                let _permit = permit;
                worker.process(job).await
            }));
        }

        tracing::info!(in_flight = in_flight.len(), "shutdown requested; draining in-flight runs");
        for joined in futures_util::future::join_all(in_flight).await {
            match joined {
                Ok(outcome) => stats.count(&outcome),
                Err(e) => tracing::error!(error = %e, "worker task aborted"),
            }
        }
        tracing::info!(
            completed = stats.completed,
            released = stats.released,
            failed = stats.failed,
            "queue worker stopped"
        );
        Ok(stats)
    }

    /// Runs a reserved job and settles it on the queue: delete on success, release with
    /// backoff on a retryable failure, move to the failed list once attempts are exhausted.
    pub async fn process(&self, job: QueuedJob) -> JobOutcome {
        let orchestration_id = CorrelationId::from(job.correlation_id.as_str());

        let payload: JobPayload = match serde_json::from_value(job.payload.clone()) {
            Ok(p) => p,
            Err(e) => {
                // Undecodable payloads never succeed; skip the retries.
                return self.fail(&job, orchestration_id, format!("invalid job payload: {e}")).await;
            }
        };

        let engine = self.engine.clone();
        let mut handle = tokio::spawn(async move { engine.run(&payload.orchestration_id, &payload.request).await });

        let limit = self.config.effective_job_timeout();
        let ran = match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined.map_err(|e| format!("run panicked: {e}")),
            Err(_) => {
                handle.abort();
                Err(format!("run timed out after {}ms", limit.as_millis()))
            }
        };

        let error = match ran {
            Ok(record) => match self.results.put(&record).await {
                Ok(()) => {
                    if let Err(e) = self.queue.delete(job.id).await {
                        tracing::warn!(job_id = job.id, error = %e, "failed to delete finished job");
                    }
                    tracing::info!(
                        orchestration_id = %orchestration_id,
                        success_rate = record.summary.success_rate,
                        "orchestration completed"
                    );
                    return JobOutcome::Completed { orchestration_id };
                }
                Err(e) => format!("failed to store result: {e}"),
            },
            Err(e) => e,
        };

        if job.attempts >= self.config.max_attempts as i32 {
            return self.fail(&job, orchestration_id, error).await;
        }

        let delay = backoff_delay(
            self.config.base_backoff,
            self.config.max_backoff,
            job.attempts.max(1) as u32,
            || fastrand::u64(..),
        );
        tracing::warn!(
            orchestration_id = %orchestration_id,
            attempts = job.attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "orchestration attempt failed; releasing job"
        );
        if let Err(e) = self.queue.release(job.id, delay).await {
            tracing::error!(job_id = job.id, error = %e, "failed to release job");
        }
        JobOutcome::Released {
            orchestration_id,
            attempts: job.attempts,
            delay,
        }
    }

    async fn fail(&self, job: &QueuedJob, orchestration_id: CorrelationId, error: String) -> JobOutcome {
        tracing::error!(
            orchestration_id = %orchestration_id,
            attempts = job.attempts,
            error = %error,
            "orchestration failed permanently"
        );
        if let Err(e) = self.queue.fail(job.id, &error).await {
            tracing::error!(job_id = job.id, error = %e, "failed to move job to failed list");
        }
        JobOutcome::Failed { orchestration_id, error }
    }
}

async fn collect_finished(in_flight: &mut Vec<JoinHandle<JobOutcome>>, stats: &mut WorkerStats) {
    let (done, pending): (Vec<_>, Vec<_>) = in_flight.drain(..).partition(|h| h.is_finished());
    *in_flight = pending;
    for joined in futures_util::future::join_all(done).await {
        match joined {
            Ok(outcome) => stats.count(&outcome),
            Err(e) => tracing::error!(error = %e, "worker task aborted"),
        }
    }
}
