mod traits;
mod types;

pub use traits::{AuditLog, JobQueue, ResultCache, StoreError};
pub use types::{
    FailedJob, NewJob, NewRequestLog, OrchestrationActivity, QueuedJob, RequestLog,
};

/// Converts a std duration into a chrono delta, saturating on overflow.
pub(crate) fn to_delta(d: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::days(365 * 100))
}
