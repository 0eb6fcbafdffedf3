use std::time::Duration;

use apiflow_core::types::DEFAULT_STEP_TIMEOUT_SECS;

/// Runtime knobs shared by the coordinator and the queue worker.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Used for steps that do not set their own `timeout`.
    pub default_step_timeout: Duration,
    /// How long completed records stay readable through `status`.
    pub result_ttl: Duration,
    pub queue: String,
    /// Whole-run attempts before a job is moved to the failed list.
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    /// Reservations older than this are considered abandoned.
    pub retry_after: Duration,
    pub concurrency: usize,
    /// Idle sleep between empty reservations.
    pub poll_interval: Duration,
    /// Wall-clock cap for one run inside the worker. `None` means "as long as the
    /// reservation stays fresh"; see [`ExecutorConfig::effective_job_timeout`].
    pub job_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_step_timeout: Duration::from_secs(DEFAULT_STEP_TIMEOUT_SECS),
            result_ttl: Duration::from_secs(3600),
            queue: "orchestration".to_string(),
            max_attempts: 3,
            base_backoff: Duration::from_secs(5),
            max_backoff: Duration::from_secs(300),
            retry_after: Duration::from_secs(90),
            concurrency: 4,
            poll_interval: Duration::from_secs(3),
            job_timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl ExecutorConfig {
    /// Overlay `APIFLOW_*` environment variables on the defaults. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(queue) = std::env::var("APIFLOW_QUEUE") {
            if !queue.trim().is_empty() {
                cfg.queue = queue;
            }
        }
        if let Some(secs) = env_parse::<u64>("APIFLOW_RESULT_TTL_SECS") {
            cfg.result_ttl = Duration::from_secs(secs);
        }
        if let Some(n) = env_parse::<u32>("APIFLOW_MAX_ATTEMPTS") {
            cfg.max_attempts = n.max(1);
        }
        if let Some(n) = env_parse::<usize>("APIFLOW_WORKER_CONCURRENCY") {
            cfg.concurrency = n.max(1);
        }
        if let Some(ms) = env_parse::<u64>("APIFLOW_POLL_INTERVAL_MS") {
            cfg.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("APIFLOW_JOB_TIMEOUT_SECS") {
            // 0 leaves only the reservation window as the cap
            cfg.job_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = env_parse::<u64>("APIFLOW_RETRY_AFTER_SECS") {
            cfg.retry_after = Duration::from_secs(secs);
        }

        cfg
    }

    /// The per-run cap the worker enforces. Always below `retry_after`, so a reservation
    /// cannot go stale and be taken by another worker while its run is still in flight.
    pub fn effective_job_timeout(&self) -> Duration {
        let ceiling = self.retry_after - self.retry_after / 10;
        self.job_timeout.map_or(ceiling, |t| t.min(ceiling))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
