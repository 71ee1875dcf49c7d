//! API route handlers
//!
//! - `health`: liveness, readiness, and metrics
//! - `transactions`: the transaction ingest endpoint

pub mod health;
pub mod transactions;

use crate::error::{ServerError, ServerResult};
use axum::http::{Method, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub const TRANSACTIONS_PATH: &str = "/api/v1/transactions";

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "name": "Salesgate",
///   "version": "0.1.0",
///   "api_version": "v1",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Salesgate",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            TRANSACTIONS_PATH,
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// 405 handler for known paths hit with the wrong method
pub async fn method_not_allowed(method: Method, uri: Uri) -> ServerError {
    tracing::warn!(method = %method, uri = %uri, "method_not_allowed");
    ServerError::MethodNotAllowed
}
