use crate::types::OrchestrationRequest;
use crate::validate::rules::step;
use crate::validate::validator::Validator;

pub(crate) fn validate_request(v: &mut Validator, request: &OrchestrationRequest) {
    v.require_non_empty("user", Some(request.user.as_str()));

    if request.steps.is_empty() {
        v.push("steps", "must contain at least one step");
    }

    for (idx, s) in request.steps.iter().enumerate() {
        step::validate_step(v, s, &format!("steps[{idx}]"));
    }
}
