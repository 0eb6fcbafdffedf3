use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone)]
pub struct NewJob {
    pub queue: String,
    pub correlation_id: String,
    pub payload: JsonValue,
    /// Higher runs sooner.
    pub priority: i16,
    pub available_at: DateTime<Utc>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct QueuedJob {
    pub id: i64,
    pub queue: String,
    pub correlation_id: String,
    pub payload: JsonValue,
    pub priority: i16,
    pub attempts: i32,
    pub reserved_at: Option<DateTime<Utc>>,
    pub available_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl QueuedJob {
    pub fn is_reserved(&self) -> bool {
        self.reserved_at.is_some()
    }
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FailedJob {
    pub id: i64,
    pub queue: String,
    pub correlation_id: String,
    pub payload: JsonValue,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRequestLog {
    pub orchestration_id: String,
    pub caller: String,
    pub url: String,
    pub method: String,
    pub request_payload: JsonValue,
    pub response_payload: JsonValue,
    pub status_code: i32,
    pub duration_ms: f64,
    pub success: bool,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct RequestLog {
    pub id: i64,
    pub orchestration_id: String,
    pub caller: String,
    pub url: String,
    pub method: String,
    pub request_payload: JsonValue,
    pub response_payload: JsonValue,
    pub status_code: i32,
    pub duration_ms: f64,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct OrchestrationActivity {
    pub orchestration_id: String,
    pub caller: String,
    pub started_at: DateTime<Utc>,
}
