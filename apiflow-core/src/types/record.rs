use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::{AnyValue, HttpMethod};

/// Globally unique id assigned to each submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(format!("orch_{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one executed step. Skipped steps produce none.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepResult {
    /// Position of the step in the submitted request.
    pub index: usize,
    pub url: String,
    pub method: HttpMethod,
    pub success: bool,
    /// 0 when no HTTP response was received.
    pub status_code: u16,
    pub duration_ms: f64,
    pub response_size: usize,
    /// Parsed JSON body, else the raw body as a string; null when the call never completed.
    pub data: AnyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extracted_data: BTreeMap<String, AnyValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Pending,
    Running,
    Completed,
    Aborted,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Pending => "pending",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunSummary {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    /// Percentage in [0, 100], rounded to two decimals.
    pub success_rate: f64,
    pub total_duration_ms: f64,
    pub average_duration_ms: f64,
}

impl RunSummary {
    pub fn from_results(results: &[StepResult]) -> Self {
        let total = results.len();
        let successful = results.iter().filter(|r| r.success).count();
        let total_duration: f64 = results.iter().map(|r| r.duration_ms).sum();

        let (success_rate, average) = if total > 0 {
            (
                round2(successful as f64 / total as f64 * 100.0),
                round2(total_duration / total as f64),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            total_requests: total,
            successful_requests: successful,
            failed_requests: total - successful,
            success_rate,
            total_duration_ms: round2(total_duration),
            average_duration_ms: average,
        }
    }
}

/// Final summary of one run, persisted under its correlation id.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrchestrationRecord {
    pub orchestration_id: CorrelationId,
    pub user: String,
    /// Always `completed` once finalized; early aborts set `stopped_early`.
    pub state: RunState,
    #[serde(default)]
    pub stopped_early: bool,
    #[serde(flatten)]
    pub summary: RunSummary,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<StepResult>,
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
