mod path;
mod template;

pub use path::lookup_path;
pub use template::{parse_template, Template, TemplateRef};

use serde_json::Value as JsonValue;

use crate::types::StepResult;

/// Resolves a `{{index.path}}` reference in `value` against earlier results.
///
/// `index` addresses `prior[index]` and `path` is walked through that result's payload.
/// On success the whole value becomes the found value's text; any literal text around the
/// reference is dropped. When the string has no reference, the index is out of range, or the
/// path does not resolve, `value` is returned unchanged. Never fails.
pub fn resolve_template(value: &str, prior: &[StepResult]) -> String {
    let Some(tpl) = parse_template(value) else {
        return value.to_string();
    };
    let Some(result) = prior.get(tpl.reference.index) else {
        return value.to_string();
    };
    match lookup_path(&result.data, &tpl.reference.path) {
        Some(found) if !found.is_null() => render_value(found),
        _ => value.to_string(),
    }
}

/// Textual form of a resolved value: strings raw, scalars literal, containers as JSON.
pub fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
