use apiflow_core::expressions::render_value;
use apiflow_core::resolve_template;
use apiflow_core::types::{
    RequestTransformation, RequestTransformationType, StepResult, StepSpec, MAX_STEP_TIMEOUT_SECS,
    MIN_STEP_TIMEOUT_SECS,
};
use serde_json::Value as JsonValue;

/// Applies the step's request transformations in declared order and returns the resulting step.
///
/// Each transformation sees the output of the previous one. Malformed or unknown entries are
/// logged and skipped.
pub fn transform_request(step: &StepSpec, prior: &[StepResult]) -> StepSpec {
    let mut out = step.clone();
    for (i, t) in step.request_transformations.iter().enumerate() {
        apply(&mut out, t, prior, i);
    }
    out
}

fn apply(step: &mut StepSpec, t: &RequestTransformation, prior: &[StepResult], position: usize) {
    if let RequestTransformationType::Unknown(name) = &t.r#type {
        tracing::warn!(transformation = %name, position, "unknown request transformation type; skipped");
        return;
    }

    let Some(raw) = t.value.as_ref().filter(|v| !v.is_null()) else {
        tracing::warn!(transformation = t.r#type.as_str(), position, "request transformation without value; skipped");
        return;
    };

    let key = t.key.as_deref().filter(|k| !k.is_empty());
    if t.r#type.requires_key() && key.is_none() {
        tracing::warn!(transformation = t.r#type.as_str(), position, "request transformation without key; skipped");
        return;
    }

    match (&t.r#type, key) {
        (RequestTransformationType::AddHeader, Some(key)) => {
            step.headers.insert(key.to_string(), resolve_text(raw, prior));
        }
        (RequestTransformationType::ModifyUrl, _) => {
            step.url = resolve_text(raw, prior);
        }
        (RequestTransformationType::AddQueryParam, Some(key)) => {
            let value = resolve_text(raw, prior);
            let sep = if step.url.contains('?') { '&' } else { '?' };
            step.url = format!("{}{}{}={}", step.url, sep, key, urlencoding::encode(&value));
        }
        (RequestTransformationType::ModifyBody, Some(key)) => {
            let value = body_value(raw, prior);
            match step.body.get_or_insert_with(|| JsonValue::Object(Default::default())) {
                JsonValue::Object(map) => {
                    map.insert(key.to_string(), value);
                }
                _ => {
                    tracing::warn!(position, "modify_body on a non-object body; skipped");
                }
            }
        }
        (RequestTransformationType::SetTimeout, _) => {
            let text = resolve_text(raw, prior);
            match parse_timeout(&text) {
                Some(secs) => step.timeout = Some(secs),
                None => {
                    tracing::warn!(value = %text, position, "set_timeout value is not an integer; keeping previous timeout");
                }
            }
        }
        _ => {}
    }
}

/// Resolves a transformation value to the text used in headers, URLs, and timeouts.
fn resolve_text(raw: &JsonValue, prior: &[StepResult]) -> String {
    match raw {
        JsonValue::String(s) => resolve_template(s, prior),
        other => render_value(other),
    }
}

/// Body fields are sent as text, like headers. Objects and arrays are inserted as given.
fn body_value(raw: &JsonValue, prior: &[StepResult]) -> JsonValue {
    match raw {
        JsonValue::Object(_) | JsonValue::Array(_) => raw.clone(),
        other => JsonValue::String(resolve_text(other, prior)),
    }
}

fn parse_timeout(text: &str) -> Option<u64> {
    let text = text.trim();
    let secs = match text.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
            f.trunc() as i64
        }
    };
    Some(secs.clamp(MIN_STEP_TIMEOUT_SECS as i64, MAX_STEP_TIMEOUT_SECS as i64) as u64)
}
