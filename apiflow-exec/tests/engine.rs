mod common;

use std::sync::Arc;

use apiflow_core::types::{
    Condition, HttpMethod, RequestTransformation, RequestTransformationType, ResponseTransformation,
    RunState, StepSpec,
};
use apiflow_core::CorrelationId;
use apiflow_exec::{AuditRecorder, Engine, HttpError};
use apiflow_store::{AuditLog, MemoryStore};
use serde_json::json;

use common::{get, json_response, request, text_response, FailingAuditLog, RecordingEventSink, ScriptedHttpClient};

fn engine_with(http: Arc<ScriptedHttpClient>) -> Engine {
    Engine::new(http)
}

#[tokio::test]
async fn runs_every_step_in_order() {
    let http = Arc::new(ScriptedHttpClient::ok());
    let engine = engine_with(http.clone());
    let req = request(vec![get("https://x.test/a"), get("https://x.test/b"), get("https://x.test/c")]);

    let record = engine.run(&CorrelationId::from("orch_1"), &req).await;

    assert_eq!(record.state, RunState::Completed);
    assert!(!record.stopped_early);
    assert_eq!(record.results.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(http.sent_paths(), vec!["/a", "/b", "/c"]);
    assert_eq!(record.summary.total_requests, 3);
    assert_eq!(record.summary.success_rate, 100.0);
    assert_eq!(record.results[0].data, json!({ "ok": true }));
    assert_eq!(record.results[0].response_size, br#"{"ok":true}"#.len());
}

#[tokio::test]
async fn status_condition_skips_step_after_server_error() {
    let http = Arc::new(ScriptedHttpClient::new(|_| Ok(json_response(500, json!({ "error": "boom" })))));
    let engine = engine_with(http.clone());

    let mut second = get("https://x.test/b");
    second.conditions = vec![Condition::status_code(0, 200)];
    let req = request(vec![get("https://x.test/a"), second]);

    let record = engine.run(&CorrelationId::from("orch_2"), &req).await;

    assert_eq!(record.results.len(), 1);
    assert_eq!(record.summary.success_rate, 0.0);
    assert_eq!(record.summary.failed_requests, 1);
    assert_eq!(record.results[0].status_code, 500);
    assert_eq!(record.results[0].error.as_deref(), Some("request returned HTTP status 500"));
    assert_eq!(http.sent_paths(), vec!["/a"]);
}

#[tokio::test]
async fn skipped_steps_do_not_shift_later_indices() {
    let http = Arc::new(ScriptedHttpClient::new(|req| {
        if req.url.path() == "/a" {
            Ok(json_response(404, json!({})))
        } else {
            Ok(json_response(200, json!({})))
        }
    }));
    let engine = engine_with(http.clone());

    let mut b = get("https://x.test/b");
    b.conditions = vec![Condition::success(0)];
    let req = request(vec![get("https://x.test/a"), b, get("https://x.test/c")]);

    let record = engine.run(&CorrelationId::from("orch_3"), &req).await;
    assert_eq!(record.results.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 2]);
}

#[tokio::test]
async fn stop_on_failure_ends_the_run_at_the_failing_step() {
    let http = Arc::new(ScriptedHttpClient::new(|req| {
        if req.url.path() == "/b" {
            Err(HttpError::Timeout)
        } else {
            Ok(json_response(200, json!({})))
        }
    }));
    let engine = engine_with(http.clone());
    let mut req = request(vec![
        get("https://x.test/a"),
        get("https://x.test/b"),
        get("https://x.test/c"),
        get("https://x.test/d"),
    ]);
    req.options.stop_on_failure = true;

    let record = engine.run(&CorrelationId::from("orch_4"), &req).await;

    assert_eq!(record.results.len(), 2);
    assert!(record.stopped_early);
    assert_eq!(record.state, RunState::Completed);
    assert_eq!(http.sent_paths(), vec!["/a", "/b"]);

    let failed = &record.results[1];
    assert!(!failed.success);
    assert_eq!(failed.status_code, 0);
    assert!(failed.data.is_null());
    assert_eq!(failed.response_size, 0);
    assert_eq!(failed.error.as_deref(), Some("request failed: timeout"));
}

#[tokio::test]
async fn failures_continue_without_stop_on_failure() {
    let http = Arc::new(ScriptedHttpClient::new(|_| Err(HttpError::Network("refused".to_string()))));
    let engine = engine_with(http);
    let req = request(vec![get("https://x.test/a"), get("https://x.test/b")]);

    let record = engine.run(&CorrelationId::from("orch_5"), &req).await;
    assert_eq!(record.results.len(), 2);
    assert_eq!(record.summary.failed_requests, 2);
    assert!(!record.stopped_early);
}

#[tokio::test]
async fn templates_and_extraction_chain_between_steps() {
    let http = Arc::new(ScriptedHttpClient::new(|req| match req.url.path() {
        "/login" => Ok(json_response(200, json!({ "session": { "token": "t-1" }, "user": { "id": 9 } }))),
        _ => Ok(text_response(201, "created")),
    }));
    let engine = engine_with(http.clone());

    let mut login = StepSpec::new(HttpMethod::Post, "https://x.test/login");
    login.response_transformations = vec![ResponseTransformation::extract_field("user.id", Some("uid"))];

    let mut create = StepSpec::new(HttpMethod::Post, "https://x.test/orders");
    create.request_transformations = vec![
        RequestTransformation::new(RequestTransformationType::AddHeader, Some("X-Session"), "{{0.session.token}}"),
        RequestTransformation::new(RequestTransformationType::ModifyBody, Some("user_id"), "{{0.user.id}}"),
        RequestTransformation::new(RequestTransformationType::AddQueryParam, Some("src"), "cli"),
    ];

    let record = engine
        .run(&CorrelationId::from("orch_6"), &request(vec![login, create]))
        .await;

    assert_eq!(record.results[0].extracted_data["uid"], json!(9));
    assert_eq!(record.results[1].url, "https://x.test/orders?src=cli");
    assert_eq!(record.results[1].data, json!("created"));

    let sent = http.sent();
    assert_eq!(sent[1].headers["X-Session"], "t-1");
    assert_eq!(sent[1].body, Some(json!({ "user_id": "9" })));
    assert_eq!(sent[1].url.query(), Some("src=cli"));
}

#[tokio::test]
async fn body_is_only_sent_for_methods_that_carry_one() {
    let http = Arc::new(ScriptedHttpClient::ok());
    let engine = engine_with(http.clone());

    let mut read = get("https://x.test/a");
    read.body = Some(json!({ "ignored": true }));
    let mut write = StepSpec::new(HttpMethod::Put, "https://x.test/b");
    write.body = Some(json!({ "sent": true }));

    engine.run(&CorrelationId::from("orch_7"), &request(vec![read, write])).await;

    let sent = http.sent();
    assert_eq!(sent[0].body, None);
    assert_eq!(sent[1].body, Some(json!({ "sent": true })));
}

#[tokio::test]
async fn invalid_url_after_transformation_is_a_failed_result() {
    let http = Arc::new(ScriptedHttpClient::ok());
    let engine = engine_with(http.clone());

    let mut step = get("https://x.test/a");
    step.request_transformations = vec![RequestTransformation::new(
        RequestTransformationType::ModifyUrl,
        None,
        "not a url",
    )];

    let record = engine.run(&CorrelationId::from("orch_8"), &request(vec![step])).await;
    assert!(!record.results[0].success);
    assert_eq!(record.results[0].url, "not a url");
    assert!(record.results[0].error.as_deref().unwrap().starts_with("request failed: invalid url"));
    assert!(http.sent().is_empty());
}

#[tokio::test]
async fn events_follow_the_run_lifecycle() {
    let http = Arc::new(ScriptedHttpClient::new(|req| {
        if req.url.path() == "/a" {
            Ok(json_response(200, json!({})))
        } else {
            Ok(json_response(503, json!({})))
        }
    }));
    let sink = Arc::new(RecordingEventSink::default());
    let engine = Engine::new(http).with_events(sink.clone());

    let mut skipped = get("https://x.test/never");
    skipped.conditions = vec![Condition::failure(0)];
    let mut req = request(vec![get("https://x.test/a"), skipped, get("https://x.test/b"), get("https://x.test/c")]);
    req.options.stop_on_failure = true;

    engine.run(&CorrelationId::from("orch_9"), &req).await;

    assert_eq!(
        sink.kinds(),
        vec![
            "run.started",
            "step.started",
            "step.finished",
            "step.skipped",
            "step.started",
            "step.finished",
            "run.aborted",
            "run.finished",
        ]
    );
}

#[tokio::test]
async fn audit_log_receives_each_call() {
    let http = Arc::new(ScriptedHttpClient::ok());
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::new(http).with_audit(AuditRecorder::new(store.clone()));

    let mut post = StepSpec::new(HttpMethod::Post, "https://x.test/b");
    post.body = Some(json!({ "n": 1 }));
    engine
        .run(&CorrelationId::from("orch_10"), &request(vec![get("https://x.test/a"), post]))
        .await;

    let logs = store.entries_for("orch_10").await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].caller, "acme");
    assert_eq!(logs[0].method, "GET");
    assert_eq!(logs[1].request_payload, json!({ "n": 1 }));
    assert_eq!(logs[1].response_payload, json!({ "ok": true }));
    assert!(logs[1].success);
}

#[tokio::test]
async fn audit_failures_never_abort_the_run() {
    let http = Arc::new(ScriptedHttpClient::ok());
    let engine = Engine::new(http).with_audit(AuditRecorder::new(Arc::new(FailingAuditLog)));

    let record = engine
        .run(&CorrelationId::from("orch_11"), &request(vec![get("https://x.test/a"), get("https://x.test/b")]))
        .await;
    assert_eq!(record.summary.successful_requests, 2);
}
