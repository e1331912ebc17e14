//! HTTP adapters - REST API implementations.

pub mod explain;

use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use explain::{explain_routes, ExplainHandlers};

/// The full application router with CORS and request tracing.
///
/// An empty origin list allows any origin.
pub fn app_router(handlers: ExplainHandlers, cors_origins: &[String]) -> Router {
    explain_routes(handlers)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
