//! Reputon query endpoint
//!
//! Endpoints:
//!   GET /repute?application=..&assertion=..&service=..&subject=..[&reporter=..][&format=..]
//!   GET /health -> Store reachability

use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::ReputeError;
use crate::reputation::{ReputationQuery, ReputationStore, resolve_reputon};

#[derive(Clone)]
pub struct ReputeApiState {
    pub store: Arc<dyn ReputationStore>,
}

impl ReputeApiState {
    pub fn new(store: Arc<dyn ReputationStore>) -> Self {
        Self { store }
    }
}

/// GET /repute - Produce a reputon for the queried subject
pub async fn get_reputon(
    State(state): State<ReputeApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ReputeError> {
    let query = ReputationQuery::from_params(&params).inspect_err(|e| {
        debug!("Rejected reputon query: {}", e);
    })?;

    let document = resolve_reputon(state.store.as_ref(), &query)
        .await
        .inspect_err(|e| match e {
            ReputeError::RecordNotFound => debug!("No prediction data for query"),
            ReputeError::StoreUnavailable(detail) => {
                error!("Reputation store unavailable: {}", detail)
            }
            other => warn!("Reputon lookup failed: {:?}", other),
        })?;

    let body = query.format.encode(&document)?;

    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(query.format.media_type()),
    );
    Ok(response)
}

/// GET /health - Check the store answers
pub async fn health(State(state): State<ReputeApiState>) -> Response {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            warn!("Health check failed: {:?}", e);
            e.into_response()
        }
    }
}

/// Create the reputon API router
pub fn create_router(state: ReputeApiState) -> Router {
    Router::new()
        .route("/repute", get(get_reputon))
        .route("/health", get(health))
        .with_state(state)
}
