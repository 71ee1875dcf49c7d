use crate::error::{ServerError, ServerResult};
use crate::metrics::record_persistence_failure;
use crate::sink::RecordSink;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use ingest::ProcessedRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Body returned for an accepted transaction
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub order_id: String,
    pub status: String,
    pub message: String,
}

impl From<&ProcessedRecord> for TransactionResponse {
    fn from(record: &ProcessedRecord) -> Self {
        Self {
            order_id: record.order_id().to_string(),
            status: record.status().to_string(),
            message: record.message().to_string(),
        }
    }
}

/// Validate, enrich, and persist one transaction
///
/// The body is read as raw bytes so the Content-Type header is not
/// enforced. Anything that is not JSON reaches the pipeline as `null` and
/// is rejected there as a malformed payload.
pub async fn ingest_transaction(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> ServerResult<Json<TransactionResponse>> {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let record = state.pipeline.process(&payload)?;

    match &state.sink {
        Some(sink) => persist(sink.as_ref(), &record).await?,
        None => tracing::warn!(
            order_id = %record.order_id(),
            "No destination table configured, record not persisted"
        ),
    }

    Ok(Json(TransactionResponse::from(&record)))
}

async fn persist(sink: &dyn RecordSink, record: &ProcessedRecord) -> ServerResult<()> {
    match sink.insert(record).await {
        Ok(row_errors) if row_errors.is_empty() => {
            tracing::info!(
                order_id = %record.order_id(),
                destination = %sink.destination(),
                "record_persisted"
            );
            Ok(())
        }
        Ok(row_errors) => {
            record_persistence_failure();
            for row in &row_errors {
                tracing::error!(
                    order_id = %record.order_id(),
                    destination = %sink.destination(),
                    index = row.index,
                    reason = %row.reason,
                    message = %row.message,
                    "row_rejected"
                );
            }
            Err(ServerError::PersistenceFailure(row_errors))
        }
        Err(err) => {
            record_persistence_failure();
            tracing::error!(
                order_id = %record.order_id(),
                destination = %sink.destination(),
                error = %err,
                "persistence_failed"
            );
            Err(ServerError::Internal(err.to_string()))
        }
    }
}
