#![forbid(unsafe_code)]

//! Queue, result cache, and audit log backends for apiflow.

pub mod memory;
pub mod postgres;
pub mod store;

pub use crate::memory::MemoryStore;
pub use crate::postgres::run_migrations;
pub use crate::postgres::PostgresStore;
pub use crate::store::{
    AuditLog, FailedJob, JobQueue, NewJob, NewRequestLog, OrchestrationActivity, QueuedJob,
    RequestLog, ResultCache, StoreError,
};
