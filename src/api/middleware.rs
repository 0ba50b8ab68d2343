//! HTTP middleware for the reputon API
//!
//! Provides:
//! - Response headers for API responses
//! - Request logging with client address masking

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::LoggingConfig;

/// Settings for the request logging middleware
#[derive(Debug, Clone)]
pub struct RequestLogConfig {
    /// Enable request logging
    pub log_requests: bool,
    /// Mask client addresses in logs
    pub sanitize_logs: bool,
}

impl From<&LoggingConfig> for RequestLogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            log_requests: config.log_requests,
            sanitize_logs: config.sanitize_logs,
        }
    }
}

/// Client address as seen through a reverse proxy: first hop of
/// `X-Forwarded-For`, then `X-Real-IP`, then the socket peer.
fn get_client_ip(headers: &HeaderMap, addr: Option<&SocketAddr>) -> String {
    ["x-forwarded-for", "x-real-ip"]
        .into_iter()
        .find_map(|name| {
            let value = headers.get(name)?.to_str().ok()?;
            value.split(',').next().map(|ip| ip.trim().to_string())
        })
        .or_else(|| addr.map(|a| a.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Mask a value for logging
pub fn sanitize_for_log(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Response headers middleware
pub async fn response_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Reputons must not be served from caches
    headers.insert(
        "Cache-Control",
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.remove("Server");

    response
}

/// How a request ended, in terms of the reputon pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestOutcome {
    Served,
    Rejected,
    NoData,
    TimedOut,
    StoreFailure,
    Other,
}

impl RequestOutcome {
    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => Self::Served,
            StatusCode::BAD_REQUEST => Self::Rejected,
            StatusCode::NOT_FOUND => Self::NoData,
            StatusCode::REQUEST_TIMEOUT => Self::TimedOut,
            s if s.is_server_error() => Self::StoreFailure,
            _ => Self::Other,
        }
    }
}

/// Request logging middleware. Each request runs inside a `request` span
/// carrying method, path and (masked) client address; the path is logged
/// without its query string since that carries the subject.
pub async fn logging_middleware(
    State(config): State<RequestLogConfig>,
    request: Request,
    next: Next,
) -> Response {
    if !config.log_requests {
        return next.run(request).await;
    }

    let addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let mut client_ip = get_client_ip(request.headers(), addr.as_ref());
    if config.sanitize_logs {
        client_ip = sanitize_for_log(&client_ip);
    }
    let span = info_span!(
        "request",
        method = %request.method(),
        path = request.uri().path(),
        client_ip = %client_ip,
    );

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let status = response.status().as_u16();
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match RequestOutcome::from_status(response.status()) {
            RequestOutcome::Served => info!(status, elapsed_ms, "reputon served"),
            RequestOutcome::Rejected => debug!(status, elapsed_ms, "query rejected"),
            RequestOutcome::NoData => info!(status, elapsed_ms, "no reputation data"),
            RequestOutcome::TimedOut => warn!(status, elapsed_ms, "request timed out"),
            RequestOutcome::StoreFailure => warn!(status, elapsed_ms, "store failure"),
            RequestOutcome::Other => debug!(status, elapsed_ms, "request finished"),
        }
        response
    }
    .instrument(span)
    .await
}
