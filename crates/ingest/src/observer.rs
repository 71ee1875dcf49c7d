//! Terminal-outcome hooks for the pipeline.
//!
//! The pipeline emits exactly one event per document: accepted or rejected.
//! [`TracingObserver`] turns those into structured log lines; other
//! implementations can count them, forward them, or record them in tests.
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::IngestError;
use crate::record::ProcessedRecord;
use crate::PipelineStage;

/// Receives the terminal transition of every pipeline run.
pub trait PipelineObserver: Send + Sync {
    fn on_accepted(&self, record: &ProcessedRecord, elapsed: Duration);

    /// `transaction_id` is a best-effort hint read from the raw document.
    fn on_rejected(
        &self,
        transaction_id: Option<&str>,
        last_stage: PipelineStage,
        error: &IngestError,
        elapsed: Duration,
    );
}

/// Emits one `tracing` event per outcome.
///
/// Date rejections log at error level, shape rejections at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_accepted(&self, record: &ProcessedRecord, elapsed: Duration) {
        info!(
            transaction_id = %record.transaction_id(),
            order_id = %record.order_id(),
            total_tax = %record.total_tax(),
            item_count = record.items().len(),
            elapsed_micros = elapsed.as_micros() as u64,
            "transaction_accepted"
        );
    }

    fn on_rejected(
        &self,
        transaction_id: Option<&str>,
        last_stage: PipelineStage,
        err: &IngestError,
        elapsed: Duration,
    ) {
        let elapsed_micros = elapsed.as_micros() as u64;
        if err.is_date_error() {
            error!(
                transaction_id = ?transaction_id,
                stage = %last_stage,
                field = ?err.field(),
                reason = err.reason_code(),
                error = %err,
                elapsed_micros,
                "transaction_rejected"
            );
        } else {
            warn!(
                transaction_id = ?transaction_id,
                stage = %last_stage,
                field = ?err.field(),
                reason = err.reason_code(),
                error = %err,
                elapsed_micros,
                "transaction_rejected"
            );
        }
    }
}
