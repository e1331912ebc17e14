//! HTTP routes for the explain endpoint.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{explain, health, method_not_allowed, ExplainHandlers};

/// Creates the explain router.
pub fn explain_routes(handlers: ExplainHandlers) -> Router {
    Router::new()
        .route("/api/explain", post(explain).fallback(method_not_allowed))
        .route("/health", get(health))
        .with_state(handlers)
}
