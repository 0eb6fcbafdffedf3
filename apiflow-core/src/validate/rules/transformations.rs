use crate::types::{
    RequestTransformation, RequestTransformationType, ResponseTransformation,
    ResponseTransformationType,
};
use crate::validate::validator::Validator;

// Unknown transformation types pass validation; they are reported and skipped when executed.
pub(crate) fn validate_request_transformation(
    v: &mut Validator,
    path: &str,
    t: &RequestTransformation,
) {
    if let RequestTransformationType::Unknown(_) = t.r#type {
        return;
    }

    if t.r#type.requires_key() {
        v.require_non_empty(&format!("{path}.key"), t.key.as_deref());
    }

    match &t.value {
        None | Some(serde_json::Value::Null) => v.push(format!("{path}.value"), "is required"),
        Some(serde_json::Value::Array(_)) | Some(serde_json::Value::Object(_))
            if t.r#type != RequestTransformationType::ModifyBody =>
        {
            v.push(format!("{path}.value"), "must be a string, number, or boolean")
        }
        Some(_) => {}
    }
}

pub(crate) fn validate_response_transformation(
    v: &mut Validator,
    path: &str,
    t: &ResponseTransformation,
) {
    match t.r#type {
        ResponseTransformationType::ExtractField => {
            v.require_non_empty(&format!("{path}.field_path"), t.field_path.as_deref());
        }
        ResponseTransformationType::RenameField => {
            v.require_non_empty(&format!("{path}.old_name"), t.old_name.as_deref());
            v.require_non_empty(&format!("{path}.new_name"), t.new_name.as_deref());
        }
        ResponseTransformationType::FilterData | ResponseTransformationType::Unknown(_) => {}
    }
}
