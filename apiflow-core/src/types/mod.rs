mod condition;
mod record;
mod request;
mod step;
mod transformation;

pub use condition::{Condition, ConditionType};
pub use record::{round2, CorrelationId, OrchestrationRecord, RunState, RunSummary, StepResult};
pub use request::{ExecutionMode, ExecutionOptions, OrchestrationRequest, Priority};
pub use step::{HttpMethod, StepSpec, DEFAULT_STEP_TIMEOUT_SECS, MAX_STEP_TIMEOUT_SECS, MIN_STEP_TIMEOUT_SECS};
pub use transformation::{
    RequestTransformation, RequestTransformationType, ResponseTransformation,
    ResponseTransformationType,
};

pub type AnyValue = serde_json::Value;
