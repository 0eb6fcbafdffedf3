use crate::error::{ValidationError, Violation};
use crate::types::OrchestrationRequest;

use super::rules;

pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }

    pub fn validate_request(&mut self, request: &OrchestrationRequest) {
        rules::request::validate_request(self, request);
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    pub(crate) fn require_non_empty(&mut self, path: &str, value: Option<&str>) {
        match value {
            Some(s) if !s.trim().is_empty() => {}
            Some(_) => self.push(path, "must not be empty"),
            None => self.push(path, "is required"),
        }
    }
}
