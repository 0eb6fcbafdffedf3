#![forbid(unsafe_code)]

//! Request model, validation, and template resolution for apiflow orchestrations.

pub mod error;
pub mod expressions;
pub mod parser;
pub mod types;
pub mod validate;

pub use crate::error::{ParseError, ValidationError, Violation};
pub use crate::expressions::{lookup_path, resolve_template};
pub use crate::parser::{parse_request_str, ParsedRequest, RequestFormat};
pub use crate::types::{
    CorrelationId, OrchestrationRecord, OrchestrationRequest, RunState, RunSummary, StepResult,
    StepSpec,
};
pub use crate::validate::{validate_request, Validate};
