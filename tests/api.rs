//! End-to-end tests against a running server.

use std::net::SocketAddr;

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, start_server, test_config, ScriptedAnswer, OFFICIAL_EMAIL};

async fn post(addr: SocketAddr, body: &str) -> (StatusCode, Value) {
    let res = client()
        .post(format!("http://{}/api/bfhl", addr))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("server unreachable");
    let status = res.status();
    (status, res.json().await.expect("body is not JSON"))
}

fn success(data: Value) -> Value {
    json!({"is_success": true, "official_email": OFFICIAL_EMAIL, "data": data})
}

fn failure(error: &str) -> Value {
    json!({"is_success": false, "official_email": OFFICIAL_EMAIL, "error": error})
}

#[tokio::test]
async fn test_math_operations_end_to_end() {
    let (addr, shutdown) = start_server(test_config(), ScriptedAnswer::answering("unused")).await;

    let (status, body) = post(addr, r#"{"fibonacci": 10}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success(json!([0, 1, 1, 2, 3, 5, 8, 13, 21, 34])));

    let (status, body) = post(addr, r#"{"prime": [2, 3, 4, 5, 6]}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success(json!([2, 3, 5])));

    let (_, body) = post(addr, r#"{"lcm": [12, 18, 24]}"#).await;
    assert_eq!(body, success(json!(72)));

    let (_, body) = post(addr, r#"{"hcf": [24, 36, 60]}"#).await;
    assert_eq!(body, success(json!(12)));

    shutdown.trigger();
}

#[tokio::test]
async fn test_validation_failures_end_to_end() {
    let (addr, shutdown) = start_server(test_config(), ScriptedAnswer::answering("unused")).await;

    let cases = [
        ("{}", "Request must contain exactly one of: fibonacci, prime, lcm, hcf, AI"),
        (r#"{"fibonacci": 10, "prime": [2, 3]}"#, "Request must contain exactly one key"),
        (r#"{"hcf": [0, 5]}"#, "Array must contain only positive integers"),
        (r#"{"fibonacci": 101}"#, "fibonacci input too large, max is 100"),
        ("null", "Request body is required"),
        ("{not json", "Invalid JSON in request body"),
    ];

    for (body, error) in cases {
        let (status, response) = post(addr, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response, failure(error), "body {}", body);
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_ai_delegate_end_to_end() {
    let ai = ScriptedAnswer::answering("Paris");
    let (addr, shutdown) = start_server(test_config(), ai.clone()).await;

    let (status, body) = post(addr, r#"{"AI": "What is the capital of France?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success(json!("Paris")));

    // rejected before the delegate is called
    let (status, _) = post(addr, r#"{"AI": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(ai.calls(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_ai_failure_maps_to_bad_gateway() {
    let (addr, shutdown) = start_server(test_config(), ScriptedAnswer::failing()).await;

    let (status, body) = post(addr, r#"{"AI": "Capital of France?"}"#).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, failure("AI service unavailable"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_too_large() {
    let (addr, shutdown) = start_server(test_config(), ScriptedAnswer::answering("unused")).await;

    let numbers: Vec<String> = (0..3000).map(|i| (i + 1).to_string()).collect();
    let body = format!(r#"{{"prime": [{}]}}"#, numbers.join(","));
    assert!(body.len() > 10 * 1024);

    let (status, response) = post(addr, &body).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response, failure("Request body too large"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_wrong_method_and_health() {
    let (addr, shutdown) = start_server(test_config(), ScriptedAnswer::answering("unused")).await;

    let res = client().get(format!("http://{}/api/bfhl", addr)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.json::<Value>().await.unwrap(), failure("Method not allowed"));

    let res = client().get(format!("http://{}/api/health", addr)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.json::<Value>().await.unwrap(), success(json!("healthy")));

    shutdown.trigger();
}

#[tokio::test]
async fn test_wrong_methods_do_not_spend_rate_budget() {
    let mut config = test_config();
    config.limits.max_requests = 2;
    let (addr, shutdown) = start_server(config, ScriptedAnswer::answering("unused")).await;
    let url = format!("http://{}/api/bfhl", addr);

    for _ in 0..2 {
        let res = client().get(&url).header("x-forwarded-for", "1.2.3.4").send().await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
    let res = client()
        .request(reqwest::Method::OPTIONS, &url)
        .header("x-forwarded-for", "1.2.3.4")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client()
        .post(&url)
        .header("content-type", "application/json")
        .header("x-forwarded-for", "1.2.3.4")
        .body(r#"{"fibonacci": 3}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), success(json!([0, 1, 1])));

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_budget_exhaustion_keeps_envelope() {
    let mut config = test_config();
    config.timeouts.request_secs = 1;
    let (addr, shutdown) = start_server(config, ScriptedAnswer::answering("unused")).await;

    let primes = vec!["18446744073709551557"; 20].join(",");
    let (status, body) = post(addr, &format!(r#"{{"prime": [{}]}}"#, primes)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, failure("Internal server error"));

    // the server keeps serving afterwards
    let (status, _) = post(addr, r#"{"hcf": [4, 6]}"#).await;
    assert_eq!(status, StatusCode::OK);

    shutdown.trigger();
}
