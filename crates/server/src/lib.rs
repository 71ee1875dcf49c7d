//! Salesgate Server - HTTP front end for the transaction ingest pipeline
//!
//! Accepts point-of-sale transactions as JSON, runs them through
//! [`ingest::TransactionPipeline`], and streams accepted records into a
//! BigQuery table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `POST /api/v1/transactions` - Validate, enrich, and persist one transaction
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe, including the persistence destination
//! - `GET /metrics` - Prometheus metrics
//!
//! Every error body is `{"error": "<message>"}`, including the 413 and
//! 408 produced by the body limit and timeout layers. With `enable_cors` on,
//! `OPTIONS` preflights are answered by the CORS layer instead.

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod sink;
pub mod state;

pub use config::{BigQueryConfig, ServerConfig};
pub use error::{ErrorResponse, ServerError, ServerResult};
pub use routes::transactions::TransactionResponse;
pub use server::{build_router, start_server};
pub use sink::{BigQuerySink, InMemorySink, RecordSink, RowError, SinkError, TableRef};
pub use state::ServerState;
