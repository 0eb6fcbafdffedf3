use apiflow_core::expressions::lookup_path;
use apiflow_core::types::{ResponseTransformation, ResponseTransformationType, StepResult};
use serde_json::{Map, Value as JsonValue};

/// Applies response transformations, in order, to an executed step's result.
pub fn transform_response(mut result: StepResult, transformations: &[ResponseTransformation]) -> StepResult {
    for (position, t) in transformations.iter().enumerate() {
        match &t.r#type {
            ResponseTransformationType::ExtractField => {
                let Some(path) = t.field_path.as_deref() else {
                    tracing::warn!(position, "extract_field without field_path; skipped");
                    continue;
                };
                if !result.data.is_object() {
                    continue;
                }
                let value = lookup_path(&result.data, path).cloned().unwrap_or(JsonValue::Null);
                let name = t.alias.as_deref().unwrap_or(path);
                result.extracted_data.insert(name.to_string(), value);
            }
            ResponseTransformationType::FilterData => {
                if t.filter.is_empty() {
                    continue;
                }
                match &mut result.data {
                    JsonValue::Object(map) => {
                        map.retain(|_, entry| entry_matches(entry, &t.filter));
                    }
                    JsonValue::Array(items) => {
                        items.retain(|entry| entry_matches(entry, &t.filter));
                    }
                    _ => {}
                }
            }
            ResponseTransformationType::RenameField => {
                let (Some(old), Some(new)) = (t.old_name.as_deref(), t.new_name.as_deref()) else {
                    tracing::warn!(position, "rename_field without old_name/new_name; skipped");
                    continue;
                };
                if let JsonValue::Object(map) = &mut result.data {
                    if let Some(v) = map.remove(old) {
                        map.insert(new.to_string(), v);
                    }
                }
            }
            ResponseTransformationType::Unknown(name) => {
                tracing::warn!(transformation = %name, position, "unknown response transformation type; skipped");
            }
        }
    }
    result
}

fn entry_matches(entry: &JsonValue, filter: &Map<String, JsonValue>) -> bool {
    let JsonValue::Object(fields) = entry else {
        return false;
    };
    // Null fields count as absent; values must match in type as well as content.
    filter
        .iter()
        .all(|(k, want)| fields.get(k).is_some_and(|got| !got.is_null() && got == want))
}
