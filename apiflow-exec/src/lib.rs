#![forbid(unsafe_code)]

//! Execution side of apiflow: the HTTP client, transformations, the sequential step engine,
//! the submission coordinator, and the background queue worker.

pub mod audit;
pub mod conditions;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod events;
pub mod http;
pub mod job;
pub mod results;
pub mod retry;
pub mod transform;
pub mod worker;

pub use crate::audit::AuditRecorder;
pub use crate::conditions::should_execute;
pub use crate::config::ExecutorConfig;
pub use crate::coordinator::{
    Acknowledgement, CancelOutcome, Coordinator, StatusReport, SubmitError, SubmitOutcome,
};
pub use crate::engine::Engine;
pub use crate::events::{Event, EventSink, NoOpEventSink, StdoutEventSink, TracingEventSink};
pub use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use crate::job::JobPayload;
pub use crate::results::{result_key, ResultStore};
pub use crate::transform::{transform_request, transform_response};
pub use crate::worker::{JobOutcome, QueueWorker, WorkerError, WorkerStats};
