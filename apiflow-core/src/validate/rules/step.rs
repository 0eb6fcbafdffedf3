use crate::types::{StepSpec, MAX_STEP_TIMEOUT_SECS, MIN_STEP_TIMEOUT_SECS};
use crate::validate::rules::{conditions, transformations};
use crate::validate::validator::Validator;

pub(crate) fn validate_step(v: &mut Validator, step: &StepSpec, path: &str) {
    validate_url(v, &format!("{path}.url"), &step.url);

    if let Some(timeout) = step.timeout {
        if !(MIN_STEP_TIMEOUT_SECS..=MAX_STEP_TIMEOUT_SECS).contains(&timeout) {
            v.push(
                format!("{path}.timeout"),
                format!("must be between {MIN_STEP_TIMEOUT_SECS} and {MAX_STEP_TIMEOUT_SECS} seconds"),
            );
        }
    }

    for name in step.headers.keys() {
        if name.trim().is_empty() {
            v.push(format!("{path}.headers"), "header names must not be empty");
        }
    }

    if let Some(body) = &step.body {
        if !(body.is_object() || body.is_array()) {
            v.push(format!("{path}.body"), "must be an object or an array");
        }
    }

    for (idx, t) in step.request_transformations.iter().enumerate() {
        transformations::validate_request_transformation(
            v,
            &format!("{path}.request_transformations[{idx}]"),
            t,
        );
    }
    for (idx, t) in step.response_transformations.iter().enumerate() {
        transformations::validate_response_transformation(
            v,
            &format!("{path}.response_transformations[{idx}]"),
            t,
        );
    }
    for (idx, c) in step.conditions.iter().enumerate() {
        conditions::validate_condition(v, &format!("{path}.conditions[{idx}]"), c);
    }
}

fn validate_url(v: &mut Validator, path: &str, raw: &str) {
    if raw.trim().is_empty() {
        v.push(path, "is required");
        return;
    }
    match url::Url::parse(raw) {
        Ok(u) => {
            if u.scheme() != "http" && u.scheme() != "https" {
                v.push(path, format!("unsupported scheme: {}", u.scheme()));
            }
            if u.host_str().is_none() {
                v.push(path, "must include a host");
            }
        }
        Err(e) => v.push(path, format!("must be a valid URL ({e})")),
    }
}
