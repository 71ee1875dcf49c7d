//! Workspace umbrella crate for the salesgate transaction ingest service.
//!
//! [`ingest`] holds the validation and enrichment pipeline; [`server`] puts
//! it behind HTTP and streams accepted records into BigQuery.

pub use ingest;
pub use server;

pub use ingest::{
    IngestConfig, IngestError, ItemPolicy, PipelineStage, ProcessedRecord, TransactionPipeline,
    process,
};
pub use server::{ServerConfig, ServerError, ServerState, build_router, start_server};
