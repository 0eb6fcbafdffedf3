use crate::types::{Condition, ConditionType};
use crate::validate::validator::Validator;

// Out-of-range and forward api_index values are accepted; they simply never constrain.
pub(crate) fn validate_condition(v: &mut Validator, path: &str, condition: &Condition) {
    if condition.r#type != ConditionType::StatusCode {
        return;
    }
    if let Some(code) = condition.value {
        if !(100..=599).contains(&code) {
            v.push(format!("{path}.value"), "must be an HTTP status code (100-599)");
        }
    }
}
