//! HTTP-level tests for the transaction endpoint and the operational routes.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::middleware::json_error_bodies;
use server::{
    InMemorySink, RecordSink, RowError, ServerConfig, ServerState, SinkError, build_router,
};
use tower::ServiceExt;

use salesgate::ProcessedRecord;

const PATH: &str = "/api/v1/transactions";

fn valid_body() -> Value {
    json!({
        "transaction_id": "T1",
        "date": "2024-01-15",
        "customer_name": "Alice",
        "items": [{"name": "Widget", "price": 9.99, "quantity": 2}],
        "total_amount": 19.98,
        "payment_method": "card"
    })
}

fn app(sink: Option<Arc<dyn RecordSink>>) -> axum::Router {
    let state = ServerState::with_sink(ServerConfig::default(), sink).expect("state builds");
    build_router(Arc::new(state))
}

async fn send(app: axum::Router, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body reads")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post_json(app: axum::Router, body: &Value) -> (StatusCode, Value) {
    send(app, Method::POST, PATH, Body::from(body.to_string())).await
}

/// Returns the configured row errors, or a transport fault.
struct FailingSink {
    row_errors: Option<Vec<RowError>>,
}

#[async_trait]
impl RecordSink for FailingSink {
    fn destination(&self) -> String {
        "failing".into()
    }

    async fn insert(&self, _record: &ProcessedRecord) -> Result<Vec<RowError>, SinkError> {
        match &self.row_errors {
            Some(errors) => Ok(errors.clone()),
            None => Err(SinkError::Unavailable("10.1.2.3 refused connection".into())),
        }
    }
}

#[tokio::test]
async fn accepted_transaction_is_persisted() {
    let sink = Arc::new(InMemorySink::default());
    let (status, body) = post_json(app(Some(sink.clone())), &valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["message"],
        "Transaction processed and stored successfully"
    );

    let stored = sink.records();
    assert_eq!(stored.len(), 1);
    assert_eq!(body["order_id"], json!(stored[0].order_id()));
    assert_eq!(stored[0].transaction_id(), "T1");
}

#[tokio::test]
async fn no_sink_still_returns_success() {
    let (status, body) = post_json(app(None), &valid_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["order_id"].is_string());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    for method in [
        Method::GET,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ] {
        let (status, body) = send(app(None), method.clone(), PATH, Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn cors_preflight_is_answered_only_when_enabled() {
    let preflight = || {
        Request::builder()
            .method(Method::OPTIONS)
            .uri(PATH)
            .header("origin", "https://pos.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .expect("request builds")
    };

    let response = app(None).oneshot(preflight()).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let config = ServerConfig {
        enable_cors: true,
        ..Default::default()
    };
    let state = ServerState::with_sink(config, None).expect("state builds");
    let response = build_router(Arc::new(state))
        .oneshot(preflight())
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn oversized_body_gets_json_413() {
    let oversized = vec![b' '; 2 * 1024 * 1024];
    let (status, body) = send(app(None), Method::POST, PATH, Body::from(oversized)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({"error": "Payload too large"}));
}

#[tokio::test]
async fn plain_timeout_response_gets_json_body() {
    let app = axum::Router::new()
        .route(
            "/slow",
            axum::routing::get(|| async { StatusCode::REQUEST_TIMEOUT }),
        )
        .layer(axum::middleware::from_fn(json_error_bodies));
    let (status, body) = send(app, Method::GET, "/slow", Body::empty()).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body, json!({"error": "Request timeout"}));
}

#[tokio::test]
async fn empty_and_non_json_bodies_are_rejected() {
    for raw in ["", "not json", "{", "{}", "[]"] {
        let (status, body) = send(app(None), Method::POST, PATH, Body::from(raw)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw:?}");
        assert_eq!(body, json!({"error": "Invalid JSON payload"}));
    }
}

#[tokio::test]
async fn validation_errors_are_400_with_message() {
    let sink = Arc::new(InMemorySink::default());

    let mut future = valid_body();
    future["date"] = json!("2099-01-01");
    let (status, body) = post_json(app(Some(sink.clone())), &future).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Transaction date cannot be in the future");

    let mut missing = valid_body();
    missing.as_object_mut().expect("object").remove("payment_method");
    let (status, body) = post_json(app(Some(sink.clone())), &missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: payment_method");

    let mut amount = valid_body();
    amount["total_amount"] = json!("19.98");
    let (status, body) = post_json(app(Some(sink.clone())), &amount).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "'total_amount' must be a number");

    assert!(sink.is_empty(), "rejected documents are never persisted");
}

#[tokio::test]
async fn content_type_is_not_enforced() {
    let request = Request::builder()
        .method(Method::POST)
        .uri(PATH)
        .header("content-type", "text/plain")
        .body(Body::from(valid_body().to_string()))
        .expect("request builds");
    let response = app(None).oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn row_errors_become_500() {
    let sink = Arc::new(FailingSink {
        row_errors: Some(vec![RowError {
            index: 0,
            reason: "invalid".into(),
            message: "no such field: total_tax".into(),
        }]),
    });
    let (status, body) = post_json(app(Some(sink)), &valid_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to insert data into BigQuery"}));
}

#[tokio::test]
async fn sink_fault_becomes_generic_500() {
    let sink = Arc::new(FailingSink { row_errors: None });
    let (status, body) = post_json(app(Some(sink)), &valid_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, body) = send(app(None), Method::GET, "/nope", Body::empty()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

#[tokio::test]
async fn readiness_reports_persistence() {
    let (status, body) = send(app(None), Method::GET, "/ready", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persistence"]["configured"], json!(false));

    let sink: Arc<dyn RecordSink> = Arc::new(InMemorySink::new("acme.sales.tx"));
    let (_, body) = send(app(Some(sink)), Method::GET, "/ready", Body::empty()).await;
    assert_eq!(body["persistence"]["configured"], json!(true));
    assert_eq!(body["persistence"]["destination"], json!("acme.sales.tx"));
}

#[tokio::test]
async fn health_and_info_respond() {
    let (status, body) = send(app(None), Method::GET, "/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(app(None), Method::GET, "/", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api_version"], "v1");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .expect("request builds");
    let response = app(None).oneshot(request).await.expect("router responds");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
}
