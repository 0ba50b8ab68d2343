//! HTTP API for the reputon service
//!
//! Provides:
//! - Reputon query endpoint (`GET /repute`)
//! - Health check (`GET /health`)
//! - Request logging and response header middleware

pub mod middleware;
pub mod repute;

pub use middleware::{
    RequestLogConfig, logging_middleware, response_headers_middleware, sanitize_for_log,
};
pub use repute::{ReputeApiState, create_router};

use axum::{Router, http::StatusCode, middleware as axum_middleware};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ReputeConfig;

/// Build the full application: routes plus middleware layers
pub fn create_app(state: ReputeApiState, config: &ReputeConfig) -> Router {
    let timeout = Duration::from_secs(config.server.request_timeout_secs);

    // Innermost first: a timed-out request still gets headers and a log line
    create_router(state)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(axum_middleware::from_fn(response_headers_middleware))
        .layer(axum_middleware::from_fn_with_state(
            RequestLogConfig::from(&config.logging),
            logging_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
