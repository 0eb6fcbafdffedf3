use std::collections::BTreeMap;

use apiflow_core::types::{
    HttpMethod, RequestTransformation, RequestTransformationType as Req, ResponseTransformation,
    StepResult, StepSpec,
};
use apiflow_exec::{transform_request, transform_response};
use serde_json::{json, Value as JsonValue};

fn prior(data: JsonValue) -> StepResult {
    StepResult {
        index: 0,
        url: "https://x.test/login".to_string(),
        method: HttpMethod::Post,
        success: true,
        status_code: 200,
        duration_ms: 3.0,
        response_size: 10,
        data,
        error: None,
        extracted_data: BTreeMap::new(),
    }
}

fn step_with(transformations: Vec<RequestTransformation>) -> StepSpec {
    let mut step = StepSpec::new(HttpMethod::Post, "https://x.test/items");
    step.request_transformations = transformations;
    step
}

#[test]
fn add_header_resolves_template_from_prior_result() {
    let results = vec![prior(json!({ "token": "abc123" }))];
    let step = step_with(vec![RequestTransformation::new(
        Req::AddHeader,
        Some("Authorization"),
        "{{0.token}}",
    )]);

    let out = transform_request(&step, &results);
    assert_eq!(out.headers.get("Authorization").map(String::as_str), Some("abc123"));
    // input untouched
    assert!(step.headers.is_empty());
}

#[test]
fn unresolvable_template_passes_through_literally() {
    let results = vec![prior(json!({ "token": "abc123" }))];
    let step = step_with(vec![
        RequestTransformation::new(Req::AddHeader, Some("X-A"), "{{0.missing}}"),
        RequestTransformation::new(Req::AddHeader, Some("X-B"), "{{3.token}}"),
    ]);

    let out = transform_request(&step, &results);
    assert_eq!(out.headers["X-A"], "{{0.missing}}");
    assert_eq!(out.headers["X-B"], "{{3.token}}");
}

#[test]
fn transformations_apply_in_order_and_query_params_are_not_deduplicated() {
    let results = vec![prior(json!({ "next": "https://api.test/search" }))];
    let step = step_with(vec![
        RequestTransformation::new(Req::ModifyUrl, None, "{{0.next}}"),
        RequestTransformation::new(Req::AddQueryParam, Some("q"), "a b&c"),
        RequestTransformation::new(Req::AddQueryParam, Some("q"), "again"),
    ]);

    let out = transform_request(&step, &results);
    assert_eq!(out.url, "https://api.test/search?q=a%20b%26c&q=again");
}

#[test]
fn modify_body_creates_body_with_resolved_text() {
    let results = vec![prior(json!({ "user": { "id": 42, "name": "Ada" } }))];
    let step = step_with(vec![
        RequestTransformation::new(Req::ModifyBody, Some("user_id"), "{{0.user.id}}"),
        RequestTransformation::new(Req::ModifyBody, Some("label"), "user-{{0.user.id}}"),
        RequestTransformation::new(Req::ModifyBody, Some("count"), 3),
    ]);

    let out = transform_request(&step, &results);
    assert_eq!(out.body, Some(json!({ "user_id": "42", "label": "42", "count": "3" })));
}

#[test]
fn prefixed_header_template_becomes_the_resolved_value() {
    let results = vec![prior(json!({ "token": "tok" }))];
    let step = step_with(vec![RequestTransformation::new(
        Req::AddHeader,
        Some("Authorization"),
        "Bearer {{0.token}}",
    )]);

    let out = transform_request(&step, &results);
    assert_eq!(out.headers["Authorization"], "tok");
}

#[test]
fn modify_body_merges_into_existing_body() {
    let mut step = step_with(vec![RequestTransformation::new(Req::ModifyBody, Some("b"), "2")]);
    step.body = Some(json!({ "a": 1, "b": 1 }));

    let out = transform_request(&step, &[]);
    assert_eq!(out.body, Some(json!({ "a": 1, "b": "2" })));
}

#[test]
fn set_timeout_clamps_and_ignores_garbage() {
    let mut step = step_with(vec![RequestTransformation::new(Req::SetTimeout, None, "900")]);
    assert_eq!(transform_request(&step, &[]).timeout, Some(300));

    step.timeout = Some(12);
    step.request_transformations = vec![RequestTransformation::new(Req::SetTimeout, None, "later")];
    assert_eq!(transform_request(&step, &[]).timeout, Some(12));

    let results = vec![prior(json!({ "limit": 7 }))];
    step.request_transformations = vec![RequestTransformation::new(Req::SetTimeout, None, "{{0.limit}}")];
    assert_eq!(transform_request(&step, &results).timeout, Some(7));
}

#[test]
fn unknown_request_transformation_is_a_no_op() {
    let step = step_with(vec![RequestTransformation::new(
        Req::Unknown("sign_request".to_string()),
        Some("k"),
        "v",
    )]);
    assert_eq!(transform_request(&step, &[]), step);
}

#[test]
fn extract_field_uses_alias_or_path() {
    let result = prior(json!({ "user": { "id": 7, "profile": { "city": "Oslo" } } }));
    let out = transform_response(
        result,
        &[
            ResponseTransformation::extract_field("user.id", Some("uid")),
            ResponseTransformation::extract_field("user.profile.city", None),
            ResponseTransformation::extract_field("user.nope", Some("gone")),
        ],
    );

    assert_eq!(out.extracted_data["uid"], json!(7));
    assert_eq!(out.extracted_data["user.profile.city"], json!("Oslo"));
    assert_eq!(out.extracted_data["gone"], JsonValue::Null);
}

#[test]
fn extract_field_skips_non_mapping_payloads() {
    let out = transform_response(
        prior(json!("plain text")),
        &[ResponseTransformation::extract_field("a", None)],
    );
    assert!(out.extracted_data.is_empty());
}

#[test]
fn filter_data_keeps_matching_entries() {
    let mut filter = serde_json::Map::new();
    filter.insert("status".to_string(), json!("active"));

    let keyed = prior(json!({
        "a": { "status": "active", "n": 1 },
        "b": { "status": "closed" },
        "meta": 3
    }));
    let out = transform_response(keyed, &[ResponseTransformation::filter_data(filter.clone())]);
    assert_eq!(out.data, json!({ "a": { "status": "active", "n": 1 } }));

    let listed = prior(json!([{ "status": "active" }, { "status": "closed" }, { "status": "active", "x": 1 }]));
    let out = transform_response(listed, &[ResponseTransformation::filter_data(filter)]);
    assert_eq!(out.data, json!([{ "status": "active" }, { "status": "active", "x": 1 }]));
}

#[test]
fn filter_data_matches_strictly_and_empty_filter_is_identity() {
    let mut filter = serde_json::Map::new();
    filter.insert("id".to_string(), json!(1));
    let out = transform_response(
        prior(json!({ "a": { "id": "1" }, "b": { "id": 1 }, "c": { "id": true } })),
        &[ResponseTransformation::filter_data(filter)],
    );
    assert_eq!(out.data, json!({ "b": { "id": 1 } }));

    let mut filter = serde_json::Map::new();
    filter.insert("owner".to_string(), JsonValue::Null);
    let out = transform_response(
        prior(json!([{ "owner": null }, { "name": "x" }])),
        &[ResponseTransformation::filter_data(filter)],
    );
    assert_eq!(out.data, json!([]));

    let data = json!({ "a": 1 });
    let out = transform_response(
        prior(data.clone()),
        &[ResponseTransformation::filter_data(serde_json::Map::new())],
    );
    assert_eq!(out.data, data);
}

#[test]
fn rename_field_moves_top_level_key_only_when_present() {
    let out = transform_response(
        prior(json!({ "old": 1, "keep": 2 })),
        &[
            ResponseTransformation::rename_field("old", "new"),
            ResponseTransformation::rename_field("absent", "other"),
        ],
    );
    assert_eq!(out.data, json!({ "new": 1, "keep": 2 }));
}
