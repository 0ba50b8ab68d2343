//! Error kinds for the reputon pipeline
//!
//! Every failure aborts the request. Errors render as a short plain-text
//! message; no partial reputon is ever written.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReputeError {
    /// A required query parameter is absent
    #[error("Malformed query")]
    MalformedRequest,
    #[error("Unrecognized application")]
    UnrecognizedApplication,
    #[error("Unrecognized assertion")]
    UnrecognizedAssertion,
    #[error("Unrecognized format")]
    UnrecognizedFormat,
    /// The store could not be reached (connect, pool timeout, I/O)
    #[error("Unable to connect to database server")]
    StoreUnavailable(String),
    /// The store was reached but rejected or failed the lookup
    #[error("Query failed")]
    QueryFailed(String),
    /// The lookup key has no row; nothing is fabricated in its place
    #[error("No data available")]
    RecordNotFound,
    #[error("Unable to encode reputon")]
    Encoding(String),
}

impl ReputeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest
            | Self::UnrecognizedApplication
            | Self::UnrecognizedAssertion
            | Self::UnrecognizedFormat => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::QueryFailed(_) | Self::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RecordNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// True for failures raised before the store is touched
    pub fn is_rejection(&self) -> bool {
        self.status_code() == StatusCode::BAD_REQUEST
    }
}

impl From<sqlx::Error> for ReputeError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::RecordNotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::StoreUnavailable(err.to_string()),
            sqlx::Error::Database(ref db)
                if db.code().is_some_and(|code| is_connection_sqlstate(&code)) =>
            {
                Self::StoreUnavailable(err.to_string())
            }
            other => Self::QueryFailed(other.to_string()),
        }
    }
}

/// SQLSTATEs the server reports when a session cannot be established:
/// connection exceptions (08), bad credentials (28), unknown database (3D)
/// and a server still starting up (57P03).
fn is_connection_sqlstate(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("28") || code.starts_with("3D") || code == "57P03"
}

impl IntoResponse for ReputeError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), self.to_string()).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}
