use crate::types::StepSpec;

/// A caller's declarative description of one orchestration run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrchestrationRequest {
    #[serde(alias = "caller")]
    pub user: String,

    #[serde(alias = "apis")]
    pub steps: Vec<StepSpec>,

    #[serde(default)]
    pub options: ExecutionOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionOptions {
    #[serde(default)]
    pub mode: ExecutionMode,

    #[serde(default, alias = "stopOnFailure")]
    pub stop_on_failure: bool,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, alias = "delaySeconds")]
    pub delay_seconds: u64,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sync,
            stop_on_failure: false,
            priority: Priority::Normal,
            delay_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sync,
    Async,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// Numeric queue priority; higher runs sooner.
    pub fn weight(&self) -> i16 {
        match self {
            Priority::Low => 1,
            Priority::Normal => 5,
            Priority::High => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}
