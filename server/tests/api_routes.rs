//! Router-level tests against an in-memory catalog source.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::test_helpers::{StaticSource, TEST_PLACEHOLDER, build_app, sample_worksheets};
use server::upstream::{EmailOutcome, UpstreamError};
use tower::ServiceExt;
use worksheet_catalog::WorksheetRecord;

async fn response_json(resp: Response) -> Value {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("deserialize response body")
}

async fn get(source: Arc<StaticSource>, uri: &str) -> (StatusCode, Value) {
    let resp = build_app(source)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    (status, response_json(resp).await)
}

async fn post_json(source: Arc<StaticSource>, uri: &str, body: String) -> (StatusCode, Value) {
    let resp = build_app(source)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    (status, response_json(resp).await)
}

fn sample_source() -> Arc<StaticSource> {
    Arc::new(StaticSource::new(sample_worksheets()))
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|w| w["id"].as_i64().expect("numeric id"))
        .collect()
}

#[tokio::test]
async fn list_all_substitutes_placeholder_thumbnails() {
    let (status, body) = get(sample_source(), "/api/worksheet").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(ids(&body), vec![1, 2, 3, 4, 5]);
    assert_eq!(body["data"][0]["thumbnail_url"], "https://cdn.example.org/series.png");
    assert_eq!(body["data"][1]["thumbnail_url"], TEST_PLACEHOLDER);
}

#[tokio::test]
async fn subject_route_filters_and_lists_subtopics() {
    let (status, body) = get(sample_source(), "/api/worksheets/arithmetic-reasoning").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 4, 5]);
    assert_eq!(body["subtopics"], json!(["Number Series", "Ratios"]));
}

#[tokio::test]
async fn subject_route_slugifies_raw_segment() {
    let (status, body) = get(sample_source(), "/api/worksheets/Word%20Knowledge").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![3]);
}

#[tokio::test]
async fn unknown_subject_is_empty_success() {
    let (status, body) = get(sample_source(), "/api/worksheets/science").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["subtopics"], json!([]));
}

#[tokio::test]
async fn subtopic_route_filters_both_levels() {
    let (status, body) = get(
        sample_source(),
        "/api/worksheets/arithmetic-reasoning/number-series",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 4, 5]);
    assert!(body.get("subtopics").is_none());
}

#[tokio::test]
async fn worksheet_route_returns_first_slug_match() {
    let (status, body) = get(
        sample_source(),
        "/api/worksheets/arithmetic-reasoning/number-series/number-series-practice",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["title"], "Number Series Practice");
}

#[tokio::test]
async fn worksheet_route_missing_title_is_not_found() {
    let (status, body) = get(
        sample_source(),
        "/api/worksheets/arithmetic-reasoning/number-series/ratio-drills",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Worksheet not found.");
}

#[tokio::test]
async fn blank_segment_is_bad_request() {
    let (status, body) = get(sample_source(), "/api/worksheets/%20%20/ratios").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing subject segment");
}

#[tokio::test]
async fn punctuation_only_segment_is_not_found() {
    let (status, body) = get(
        sample_source(),
        "/api/worksheets/arithmetic-reasoning/ratios/%3F%3F",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Worksheet not found.");
}

#[tokio::test]
async fn non_ascii_subject_is_reachable() {
    let mut worksheets = sample_worksheets();
    worksheets.push(WorksheetRecord::new(9, "数学", "加法", "练习"));
    let source = Arc::new(StaticSource::new(worksheets));

    let (status, body) = get(source, "/api/worksheets/%E6%95%B0%E5%AD%A6").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![9]);
    assert_eq!(body["subtopics"], json!(["加法"]));
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway_not_empty() {
    let source = Arc::new(StaticSource::failing(|| UpstreamError::Status {
        endpoint: "worksheets",
        status: 503,
    }));

    let (status, body) = get(source, "/api/worksheets/arithmetic-reasoning").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to fetch worksheets from upstream");
}

#[tokio::test]
async fn subjects_are_passed_through() {
    let (status, body) = get(sample_source(), "/api/subjects").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 1, "name": "Math" }]));
}

#[tokio::test]
async fn subtopics_require_subject_id() {
    let (status, body) = get(sample_source(), "/api/subtopics").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or invalid subject_id");

    let (status, body) = get(sample_source(), "/api/subtopics?subject_id=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject_id"], "7");
}

fn email_body() -> Value {
    json!({
        "name": "Jane <Doe>",
        "email": "jane@example.com",
        "mobile": "555-0100",
        "worksheet_id": 5,
        "subject": "arithmetic-reasoning",
        "subtopic": "number-series"
    })
}

#[tokio::test]
async fn send_email_forwards_sanitized_request() {
    let source = sample_source();
    let (status, body) = post_json(source.clone(), "/api/send-email", email_body().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let sent = source.sent_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "Jane Doe");
    assert_eq!(sent[0].worksheet_id, serde_json::Number::from(5));
}

#[tokio::test]
async fn send_email_rejects_invalid_fields() {
    let source = sample_source();
    let mut body = email_body();
    body["worksheet_id"] = json!("5");

    let (status, resp) = post_json(source.clone(), "/api/send-email", body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Invalid or missing input fields.");
    assert!(source.sent_requests().is_empty());
}

#[tokio::test]
async fn send_email_rejects_malformed_json() {
    let (status, resp) = post_json(sample_source(), "/api/send-email", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Invalid or missing input fields.");
}

#[tokio::test]
async fn send_email_surfaces_upstream_rejection() {
    let mut source = StaticSource::new(sample_worksheets());
    source.email_outcome = EmailOutcome::Rejected("Mailbox unavailable".to_string());

    let (status, resp) = post_json(Arc::new(source), "/api/send-email", email_body().to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Mailbox unavailable");
}

#[tokio::test]
async fn send_email_only_accepts_post() {
    let resp = build_app(sample_source())
        .oneshot(
            Request::builder()
                .uri("/api/send-email")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn worksheet_route_only_accepts_get() {
    let resp = build_app(sample_source())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/worksheets/a/b/c")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
