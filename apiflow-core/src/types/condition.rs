/// Gate on the outcome of an earlier step. All conditions on a step are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub r#type: ConditionType,

    /// Position in the list of results produced so far; negative means "no constraint".
    #[serde(default = "no_index", alias = "apiIndex")]
    pub api_index: i64,

    /// Expected status code for `status_code` conditions (200 when omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u16>,
}

fn no_index() -> i64 {
    -1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    #[default]
    Success,
    Failure,
    StatusCode,
}

impl Condition {
    pub fn success(api_index: i64) -> Self {
        Self { r#type: ConditionType::Success, api_index, value: None }
    }

    pub fn failure(api_index: i64) -> Self {
        Self { r#type: ConditionType::Failure, api_index, value: None }
    }

    pub fn status_code(api_index: i64, value: u16) -> Self {
        Self { r#type: ConditionType::StatusCode, api_index, value: Some(value) }
    }

    pub fn expected_status(&self) -> u16 {
        self.value.unwrap_or(200)
    }
}
