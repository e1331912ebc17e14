//! Integration tests for the explain HTTP surface.
//!
//! These tests drive the full router, CORS and tracing layers included,
//! with `tower::ServiceExt::oneshot`:
//! 1. POST always answers 200 with the explanation contract
//! 2. Other methods are rejected with 405
//! 3. Malformed bodies still produce a complete payload

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use captain_click::adapters::ai::{GatewayConfig, MockAIProvider, ModelGateway};
use captain_click::adapters::http::{app_router, ExplainHandlers};
use captain_click::adapters::rate_limiter::InMemoryRateLimiter;
use captain_click::application::{GenerateExplanationHandler, GenerationSettings};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(provider: &MockAIProvider) -> Router {
    let gateway = ModelGateway::new(Arc::new(provider.clone()), GatewayConfig::default());
    let handler = GenerateExplanationHandler::new(Arc::new(gateway), GenerationSettings::default());
    app_router(ExplainHandlers::new(Arc::new(handler)), &[])
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/explain")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// POST /api/explain
// =============================================================================

#[tokio::test]
async fn post_returns_generated_explanation() {
    let provider = MockAIProvider::new().with_response(
        r#"{"content":"החתולים אספו $2+3$ כדורי צמר","visual":"🧶🧶","nextButtonText":"יאללה"}"#,
    );
    let request = json!({
        "name": "מיה",
        "gender": "girl",
        "grade": "1-2",
        "interests": "חתולים",
        "topic": "חיבור",
        "stage": 2,
        "attemptNumber": 1
    });

    let response = app(&provider)
        .oneshot(post_json(request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["isQuestion"], false);
    assert_eq!(body["topicMatch"], true);
    assert_eq!(body["method"], "story_based");
    assert!(body["content"].as_str().unwrap().contains("החתולים"));
    assert!(body["nextButtonText"].is_string());
    assert!(body.get("hint").is_none());
    assert!(body.get("correctAnswer").is_none());
}

#[tokio::test]
async fn question_stage_returns_hint_and_answer() {
    let provider = MockAIProvider::new();
    let request = json!({ "topic": "כפל", "stage": "5", "interests": "רובוטים" });

    let response = app(&provider)
        .oneshot(post_json(request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["isQuestion"], true);
    assert!(body["hint"].is_string());
    assert_eq!(body["correctAnswer"], "20");
    assert!(body.get("nextButtonText").is_none());
}

#[tokio::test]
async fn malformed_body_still_returns_200() {
    let provider = MockAIProvider::new();

    let response = app(&provider)
        .oneshot(post_json("{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["content"].as_str().unwrap().is_empty());
    assert_eq!(body["topicMatch"], false);
}

#[tokio::test]
async fn unknown_topic_reports_no_match() {
    let provider = MockAIProvider::new();
    let request = json!({ "topic": "גאומטריה", "stage": 1 });

    let response = app(&provider)
        .oneshot(post_json(request.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["topicMatch"], false);
}

#[tokio::test]
async fn over_quota_still_returns_200() {
    let provider = MockAIProvider::new();
    let gateway = ModelGateway::new(Arc::new(provider.clone()), GatewayConfig::default());
    let limiter = InMemoryRateLimiter::new(0).with_cleanup_probability(0.0);
    let handler = GenerateExplanationHandler::new(Arc::new(gateway), GenerationSettings::default())
        .with_rate_limiter(Arc::new(limiter));
    let app = app_router(ExplainHandlers::new(Arc::new(handler)), &[]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/explain")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::from(json!({ "topic": "חיסור" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.call_count(), 0);
}

// =============================================================================
// Other routes and methods
// =============================================================================

#[tokio::test]
async fn get_on_explain_is_rejected() {
    let provider = MockAIProvider::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/explain")
        .body(Body::empty())
        .unwrap();

    let response = app(&provider).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await, json!({ "error": "Method not allowed" }));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn health_reports_ok() {
    let provider = MockAIProvider::new();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app(&provider).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let provider = MockAIProvider::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/explain")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(&provider).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
