use apiflow_core::types::{
    ConditionType, ExecutionMode, HttpMethod, Priority, RequestTransformationType,
    ResponseTransformationType,
};
use apiflow_core::{parse_request_str, validate_request, RequestFormat};

fn minimal_valid_yaml() -> &'static str {
    r#"
user: acme
steps:
  - url: https://api.example.com/users/1
    method: GET
"#
}

#[test]
fn parse_yaml_and_validate_ok() {
    let parsed = parse_request_str(minimal_valid_yaml(), RequestFormat::Yaml).unwrap();
    validate_request(&parsed.request).unwrap();
    assert_eq!(parsed.request.options.mode, ExecutionMode::Sync);
    assert_eq!(parsed.request.options.priority, Priority::Normal);
    assert!(!parsed.request.options.stop_on_failure);
}

#[test]
fn parse_auto_detects_yaml() {
    let parsed = parse_request_str(minimal_valid_yaml(), RequestFormat::Auto).unwrap();
    assert_eq!(parsed.format, RequestFormat::Yaml);
}

#[test]
fn parse_auto_detects_json() {
    let json = r#"{ "user": "acme", "steps": [ { "url": "https://x.test/a", "method": "get" } ] }"#;
    let parsed = parse_request_str(json, RequestFormat::Auto).unwrap();
    assert_eq!(parsed.format, RequestFormat::Json);
    assert_eq!(parsed.request.steps[0].method, HttpMethod::Get);
}

#[test]
fn parse_accepts_legacy_and_camel_case_field_names() {
    let json = r#"
{
  "caller": "acme",
  "apis": [
    { "url": "https://x.test/a", "method": "POST", "body": {"a": 1} },
    {
      "url": "https://x.test/b",
      "method": "GET",
      "requestTransformations": [ { "type": "add_header", "key": "X-Id", "value": "{{0.id}}" } ],
      "responseTransformations": [ { "type": "extract_field", "fieldPath": "user.id", "alias": "uid" } ],
      "conditions": [ { "type": "status_code", "apiIndex": 0, "value": 201 } ]
    }
  ],
  "options": { "mode": "async", "stopOnFailure": true, "priority": "high", "delaySeconds": 5 }
}
"#;
    let parsed = parse_request_str(json, RequestFormat::Json).unwrap();
    let req = parsed.request;
    validate_request(&req).unwrap();

    assert_eq!(req.user, "acme");
    assert_eq!(req.steps.len(), 2);
    assert_eq!(req.options.mode, ExecutionMode::Async);
    assert!(req.options.stop_on_failure);
    assert_eq!(req.options.priority, Priority::High);
    assert_eq!(req.options.delay_seconds, 5);

    let step = &req.steps[1];
    assert_eq!(
        step.request_transformations[0].r#type,
        RequestTransformationType::AddHeader
    );
    assert_eq!(
        step.response_transformations[0].field_path.as_deref(),
        Some("user.id")
    );
    assert_eq!(step.conditions[0].r#type, ConditionType::StatusCode);
    assert_eq!(step.conditions[0].api_index, 0);
    assert_eq!(step.conditions[0].value, Some(201));
}

#[test]
fn unknown_transformation_types_parse_and_validate() {
    let yaml = r#"
user: acme
steps:
  - url: https://x.test/a
    method: GET
    request_transformations:
      - type: encrypt_payload
        key: k
    response_transformations:
      - type: flatten
"#;
    let parsed = parse_request_str(yaml, RequestFormat::Yaml).unwrap();
    validate_request(&parsed.request).unwrap();
    let step = &parsed.request.steps[0];
    assert_eq!(
        step.request_transformations[0].r#type,
        RequestTransformationType::Unknown("encrypt_payload".to_string())
    );
    assert_eq!(
        step.response_transformations[0].r#type,
        ResponseTransformationType::Unknown("flatten".to_string())
    );
}

#[test]
fn condition_defaults_to_success_without_index() {
    let yaml = r#"
user: acme
steps:
  - url: https://x.test/a
    method: GET
    conditions:
      - {}
"#;
    let parsed = parse_request_str(yaml, RequestFormat::Yaml).unwrap();
    let c = &parsed.request.steps[0].conditions[0];
    assert_eq!(c.r#type, ConditionType::Success);
    assert_eq!(c.api_index, -1);
    assert_eq!(c.expected_status(), 200);
}

#[test]
fn unsupported_method_is_a_parse_error() {
    let json = r#"{ "user": "acme", "steps": [ { "url": "https://x.test/a", "method": "TRACE" } ] }"#;
    let err = parse_request_str(json, RequestFormat::Json).unwrap_err();
    assert!(err.to_string().contains("unsupported HTTP method"));
}

#[test]
fn negative_delay_is_a_parse_error() {
    let json = r#"{ "user": "acme", "steps": [ { "url": "https://x.test/a", "method": "GET" } ], "options": { "delay_seconds": -1 } }"#;
    assert!(parse_request_str(json, RequestFormat::Json).is_err());
}

#[test]
fn validation_collects_all_violations() {
    let yaml = r#"
user: "  "
steps:
  - url: not a url
    method: GET
    timeout: 0
  - url: ftp://files.example.com/x
    method: POST
    timeout: 301
    body: "plain"
    request_transformations:
      - type: add_header
        value: x
      - type: modify_url
    response_transformations:
      - type: extract_field
      - type: rename_field
        old_name: a
    conditions:
      - type: status_code
        api_index: 0
        value: 42
"#;
    let parsed = parse_request_str(yaml, RequestFormat::Yaml).unwrap();
    let err = validate_request(&parsed.request).unwrap_err();
    let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();

    assert!(paths.contains(&"user"));
    assert!(paths.contains(&"steps[0].url"));
    assert!(paths.contains(&"steps[0].timeout"));
    assert!(paths.contains(&"steps[1].url"));
    assert!(paths.contains(&"steps[1].timeout"));
    assert!(paths.contains(&"steps[1].body"));
    assert!(paths.contains(&"steps[1].request_transformations[0].key"));
    assert!(paths.contains(&"steps[1].request_transformations[1].value"));
    assert!(paths.contains(&"steps[1].response_transformations[0].field_path"));
    assert!(paths.contains(&"steps[1].response_transformations[1].new_name"));
    assert!(paths.contains(&"steps[1].conditions[0].value"));
}

#[test]
fn empty_step_list_fails_validation() {
    let parsed = parse_request_str("user: acme\nsteps: []\n", RequestFormat::Yaml).unwrap();
    let err = validate_request(&parsed.request).unwrap_err();
    assert_eq!(err.violations[0].path, "steps");
}

#[test]
fn forward_condition_reference_is_accepted() {
    let yaml = r#"
user: acme
steps:
  - url: https://x.test/a
    method: GET
    conditions:
      - type: success
        api_index: 5
"#;
    let parsed = parse_request_str(yaml, RequestFormat::Yaml).unwrap();
    validate_request(&parsed.request).unwrap();
}
