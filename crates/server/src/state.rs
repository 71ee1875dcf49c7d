use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::metrics::MetricsObserver;
use crate::sink::{BigQuerySink, RecordSink};
use ingest::TransactionPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Validation and enrichment pipeline (shared across requests)
    pub pipeline: Arc<TransactionPipeline>,

    /// Destination for accepted records. `None` runs validate-only.
    pub sink: Option<Arc<dyn RecordSink>>,

    /// Prometheus render handle, present once the recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state, connecting a BigQuery sink when a table is set.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let sink = match &config.bq_table {
            Some(table) => {
                let sink = BigQuerySink::from_table_name(table, &config.bigquery)?;
                Some(Arc::new(sink) as Arc<dyn RecordSink>)
            }
            None => None,
        };
        Self::with_sink(config, sink)
    }

    /// Create state around an explicit sink.
    pub fn with_sink(
        config: ServerConfig,
        sink: Option<Arc<dyn RecordSink>>,
    ) -> ServerResult<Self> {
        let pipeline = TransactionPipeline::new(config.ingest.clone())
            .map_err(|err| ServerError::Config(err.to_string()))?
            .with_observer(Arc::new(MetricsObserver::default()));

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            sink,
            metrics_handle: None,
        })
    }

    /// Swap the pipeline, e.g. to pin the clock in tests.
    pub fn with_pipeline(mut self, pipeline: TransactionPipeline) -> Self {
        self.pipeline = Arc::new(pipeline);
        self
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// Where accepted records go, for logs and readiness output.
    pub fn destination(&self) -> Option<String> {
        self.sink.as_ref().map(|sink| sink.destination())
    }
}
