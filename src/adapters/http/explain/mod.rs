//! HTTP adapter for the explain endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, ExplainRequest, ExplainResponse, HealthResponse};
pub use handlers::ExplainHandlers;
pub use routes::explain_routes;
