use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::sink::{RowError, SinkError};

pub type ServerResult<T> = Result<T, ServerError>;

/// Fixed body text for persistence rejections; row detail stays in the logs.
pub const PERSISTENCE_FAILURE_MESSAGE: &str = "Failed to insert data into BigQuery";
/// Fixed body text for every other server-side fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Ingest(#[from] ingest::IngestError),

    #[error("Persistence rejected the record: {}", format_row_errors(.0))]
    PersistenceFailure(Vec<RowError>),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Request timeout")]
    RequestTimeout,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Ingest(err) => {
                StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::PersistenceFailure(_)
            | ServerError::Internal(_)
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller. Server-side detail is never exposed.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::PersistenceFailure(_) => PERSISTENCE_FAILURE_MESSAGE.to_string(),
            ServerError::Internal(_) | ServerError::Config(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request_failed");
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        (status, body).into_response()
    }
}

impl From<SinkError> for ServerError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::InvalidTable(_) => ServerError::Config(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

fn format_row_errors(errors: &[RowError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
