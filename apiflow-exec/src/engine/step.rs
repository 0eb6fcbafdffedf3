use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use apiflow_core::types::{round2, StepResult, StepSpec};
use serde_json::Value as JsonValue;

use crate::http::{HttpClient, HttpError, HttpRequestParts};

/// Issues the call described by an already-transformed step. Never fails: transport errors and
/// non-2xx statuses become a result with `success = false`.
pub(crate) async fn execute_step(
    http: &dyn HttpClient,
    index: usize,
    step: &StepSpec,
    timeout: Duration,
    started: Instant,
) -> StepResult {
    let sent = match build_request(step) {
        Ok(parts) => http.send(parts, timeout).await,
        Err(e) => Err(e),
    };
    let duration_ms = round2(started.elapsed().as_secs_f64() * 1000.0);

    match sent {
        Ok(resp) => {
            let success = resp.is_success();
            StepResult {
                index,
                url: step.url.clone(),
                method: step.method,
                success,
                status_code: resp.status,
                duration_ms,
                response_size: resp.body.len(),
                data: resp.payload(),
                error: (!success).then(|| format!("request returned HTTP status {}", resp.status)),
                extracted_data: BTreeMap::new(),
            }
        }
        Err(e) => StepResult {
            index,
            url: step.url.clone(),
            method: step.method,
            success: false,
            status_code: 0,
            duration_ms,
            response_size: 0,
            data: JsonValue::Null,
            error: Some(format!("request failed: {e}")),
            extracted_data: BTreeMap::new(),
        },
    }
}

fn build_request(step: &StepSpec) -> Result<HttpRequestParts, HttpError> {
    let url = url::Url::parse(&step.url).map_err(|e| HttpError::InvalidUrl(format!("{}: {e}", step.url)))?;
    let body = if step.method.carries_body() {
        step.body.clone()
    } else {
        None
    };
    Ok(HttpRequestParts {
        method: step.method,
        url,
        headers: step.headers.clone(),
        body,
    })
}
