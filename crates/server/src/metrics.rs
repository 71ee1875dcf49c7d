//! Prometheus counters for the transaction pipeline.
use std::time::Duration;

use ingest::{IngestError, PipelineObserver, PipelineStage, ProcessedRecord, TracingObserver};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const TRANSACTIONS_ACCEPTED: &str = "salesgate_transactions_accepted_total";
pub const TRANSACTIONS_REJECTED: &str = "salesgate_transactions_rejected_total";
pub const PERSISTENCE_FAILURES: &str = "salesgate_persistence_failures_total";
pub const PIPELINE_DURATION: &str = "salesgate_pipeline_duration_seconds";

/// Installs the global Prometheus recorder and returns the render handle.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// Counts pipeline outcomes, then forwards to [`TracingObserver`] so the
/// structured log lines are unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObserver {
    inner: TracingObserver,
}

impl PipelineObserver for MetricsObserver {
    fn on_accepted(&self, record: &ProcessedRecord, elapsed: Duration) {
        counter!(TRANSACTIONS_ACCEPTED).increment(1);
        histogram!(PIPELINE_DURATION).record(elapsed.as_secs_f64());
        self.inner.on_accepted(record, elapsed);
    }

    fn on_rejected(
        &self,
        transaction_id: Option<&str>,
        last_stage: PipelineStage,
        error: &IngestError,
        elapsed: Duration,
    ) {
        counter!(TRANSACTIONS_REJECTED, "reason" => error.reason_code()).increment(1);
        histogram!(PIPELINE_DURATION).record(elapsed.as_secs_f64());
        self.inner
            .on_rejected(transaction_id, last_stage, error, elapsed);
    }
}

/// Bumped by the ingest handler when the sink refuses or fails a row.
pub fn record_persistence_failure() {
    counter!(PERSISTENCE_FAILURES).increment(1);
}
