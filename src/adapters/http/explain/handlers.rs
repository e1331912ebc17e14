//! HTTP handlers for the explain endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::GenerateExplanationHandler;
use crate::ports::ANONYMOUS_CLIENT;

use super::dto::{ErrorResponse, ExplainRequest, ExplainResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ExplainHandlers {
    generate_handler: Arc<GenerateExplanationHandler>,
}

impl ExplainHandlers {
    pub fn new(generate_handler: Arc<GenerateExplanationHandler>) -> Self {
        Self { generate_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/explain - Generate an explanation or question.
///
/// Always answers 200 with a complete payload.
pub async fn explain(
    State(handlers): State<ExplainHandlers>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client_id = client_id(&headers, connect_info.as_ref());
    let cmd = ExplainRequest::from_body(&body).into_command(client_id);

    let generated = handlers.generate_handler.handle(cmd).await;
    (StatusCode::OK, Json(ExplainResponse::from(generated))).into_response()
}

/// Any method other than POST on the explain route.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::method_not_allowed()),
    )
        .into_response()
}

/// GET /health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Rate-limit identity for a request.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first entry)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
/// 4. "anonymous"
fn client_id(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header("x-real-ip") {
        return real_ip.to_string();
    }

    connect_info
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
}
