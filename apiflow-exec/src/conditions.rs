use apiflow_core::types::{Condition, ConditionType, StepResult, StepSpec};

/// Whether `step` should run given the results produced so far.
///
/// Conditions are ANDed. A condition whose `api_index` is negative or does not address an
/// existing result adds no constraint.
pub fn should_execute(step: &StepSpec, prior: &[StepResult]) -> bool {
    unmet_condition(step, prior).is_none()
}

/// The first resolvable condition that fails, if any.
pub fn unmet_condition<'a>(step: &'a StepSpec, prior: &[StepResult]) -> Option<&'a Condition> {
    step.conditions.iter().find(|c| {
        let Some(result) = usize::try_from(c.api_index).ok().and_then(|i| prior.get(i)) else {
            return false;
        };
        !holds(c, result)
    })
}

fn holds(condition: &Condition, result: &StepResult) -> bool {
    match condition.r#type {
        ConditionType::Success => result.success,
        ConditionType::Failure => !result.success,
        ConditionType::StatusCode => result.status_code == condition.expected_status(),
    }
}
