mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::OrchestrationRequest;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for OrchestrationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_request(self)
    }
}

/// Checks the shape of a submission, collecting every violation before failing.
pub fn validate_request(request: &OrchestrationRequest) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_request(request);
    v.finish()
}
