#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use apiflow_core::types::{HttpMethod, OrchestrationRequest, StepSpec};
use apiflow_exec::{Event, EventSink, HttpClient, HttpError, HttpRequestParts, HttpResponseParts};
use apiflow_store::{AuditLog, NewRequestLog, OrchestrationActivity, RequestLog, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

type Responder = dyn Fn(&HttpRequestParts) -> Result<HttpResponseParts, HttpError> + Send + Sync;

/// Answers each call through a closure and remembers every request it saw.
pub struct ScriptedHttpClient {
    responder: Box<Responder>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<HttpRequestParts>>,
}

impl ScriptedHttpClient {
    pub fn new(
        responder: impl Fn(&HttpRequestParts) -> Result<HttpResponseParts, HttpError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call answers `200` with `{"ok": true}`.
    pub fn ok() -> Self {
        Self::new(|_| Ok(json_response(200, serde_json::json!({ "ok": true }))))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<HttpRequestParts> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sent_paths(&self) -> Vec<String> {
        self.sent().iter().map(|r| r.url.path().to_string()).collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn send(&self, req: HttpRequestParts, _timeout: Duration) -> Result<HttpResponseParts, HttpError> {
        self.requests.lock().unwrap().push(req.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&req)
    }
}

pub fn json_response(status: u16, body: JsonValue) -> HttpResponseParts {
    HttpResponseParts {
        status,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub fn text_response(status: u16, body: &str) -> HttpResponseParts {
    HttpResponseParts {
        status,
        body: body.as_bytes().to_vec(),
    }
}

#[derive(Default)]
pub struct RecordingEventSink {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingEventSink {
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct FailingAuditLog;

#[async_trait]
impl AuditLog for FailingAuditLog {
    async fn append(&self, _entry: NewRequestLog) -> Result<(), StoreError> {
        Err(StoreError::Other("audit table missing".to_string()))
    }

    async fn entries_for(&self, _orchestration_id: &str) -> Result<Vec<RequestLog>, StoreError> {
        Ok(Vec::new())
    }

    async fn recent_orchestrations(&self, _limit: i64) -> Result<Vec<OrchestrationActivity>, StoreError> {
        Ok(Vec::new())
    }

    async fn prune(&self, _before: DateTime<Utc>, _dry_run: bool) -> Result<u64, StoreError> {
        Ok(0)
    }
}

pub fn get(url: &str) -> StepSpec {
    StepSpec::new(HttpMethod::Get, url)
}

pub fn request(steps: Vec<StepSpec>) -> OrchestrationRequest {
    OrchestrationRequest {
        user: "acme".to_string(),
        steps,
        options: Default::default(),
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
