//! Transaction ingest pipeline
//!
//! This is where point-of-sale transactions enter the system. A raw JSON
//! document is checked, decoded, dated, enriched, and assembled into an
//! immutable [`ProcessedRecord`] that the server hands to the analytical
//! store.
//!
//! ## What we do here
//!
//! - **Validate shape** - Required fields, items list, per-item keys, numeric amount
//! - **Decode** - Loose `serde_json::Value` into a typed [`TransactionRequest`]
//! - **Check the date** - Strict `YYYY-MM-DD`, never later than today (UTC)
//! - **Enrich** - Tax in fixed-point decimal, a UUIDv4 order id, `processed_at`
//! - **Report** - One structured event per document through a [`PipelineObserver`]
//!
//! ## Stages
//!
//! ```text
//! Received ──schema──▶ SchemaChecked ──date──▶ DateChecked ──▶ Enriched ──▶ Assembled
//!     │                     │
//!     └─────────────────────┴──────────────▶ Rejected
//! ```
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use ingest::{FixedClock, IngestConfig, TransactionPipeline};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let pipeline = TransactionPipeline::new(IngestConfig::default())
//!     .unwrap()
//!     .with_clock(Arc::new(FixedClock(now)));
//!
//! let record = pipeline
//!     .process(&json!({
//!         "transaction_id": "T1",
//!         "date": "2024-01-15",
//!         "customer_name": "Alice",
//!         "items": [{"name": "Widget", "price": 9.99, "quantity": 2}],
//!         "total_amount": 19.98,
//!         "payment_method": "card"
//!     }))
//!     .unwrap();
//!
//! assert_eq!(record.total_tax().to_string(), "1.40");
//! ```
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

mod clock;
mod config;
mod date;
mod enrich;
mod error;
mod observer;
mod record;
mod schema;
mod types;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::{ConfigError, IngestConfig, ItemPolicy, MAX_TAX_SCALE};
pub use crate::date::{normalize_date, parse_transaction_date};
pub use crate::enrich::{compute_tax, enrich, format_processed_at, Enrichment, PROCESSED_AT_FORMAT};
pub use crate::error::IngestError;
pub use crate::observer::{PipelineObserver, TracingObserver};
pub use crate::record::{assemble, ProcessedRecord, STATUS_SUCCESS, SUCCESS_MESSAGE};
pub use crate::schema::validate_schema;
pub use crate::types::{LineItem, TransactionRequest, REQUIRED_FIELDS};

/// Where a document is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Received,
    SchemaChecked,
    DateChecked,
    Enriched,
    Assembled,
    Rejected,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::SchemaChecked => "schema_checked",
            PipelineStage::DateChecked => "date_checked",
            PipelineStage::Enriched => "enriched",
            PipelineStage::Assembled => "assembled",
            PipelineStage::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Assembled | PipelineStage::Rejected)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation-and-enrichment pipeline for single transaction documents.
///
/// Holds only read-only configuration and collaborators, so one instance can
/// be shared across threads behind an `Arc` and called concurrently.
#[derive(Clone)]
pub struct TransactionPipeline {
    config: IngestConfig,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn PipelineObserver>,
}

impl fmt::Debug for TransactionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TransactionPipeline {
    /// Builds a pipeline on the system clock with tracing output.
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: IngestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Runs one document through every stage.
    ///
    /// Stops at the first rejection. Emits exactly one observer event; on
    /// rejection it carries the last stage the document passed before moving
    /// to [`PipelineStage::Rejected`].
    pub fn process(&self, payload: &Value) -> Result<ProcessedRecord, IngestError> {
        let start = Instant::now();
        let mut stage = PipelineStage::Received;

        match self.run(payload, &mut stage) {
            Ok(record) => {
                debug_assert_eq!(stage, PipelineStage::Assembled);
                self.observer.on_accepted(&record, start.elapsed());
                Ok(record)
            }
            Err(err) => {
                let transaction_id = payload.get("transaction_id").and_then(Value::as_str);
                self.observer
                    .on_rejected(transaction_id, stage, &err, start.elapsed());
                Err(err)
            }
        }
    }

    fn run(
        &self,
        payload: &Value,
        stage: &mut PipelineStage,
    ) -> Result<ProcessedRecord, IngestError> {
        let now = self.clock.now();

        let request = validate_schema(payload, self.config.item_policy)?;
        *stage = PipelineStage::SchemaChecked;

        normalize_date(&request.date, now.date_naive())?;
        *stage = PipelineStage::DateChecked;

        let enrichment = enrich(request.total_amount, now, &self.config);
        *stage = PipelineStage::Enriched;

        let record = assemble(request, enrichment);
        *stage = PipelineStage::Assembled;

        Ok(record)
    }
}

/// One-shot processing on the system clock with tracing output.
///
/// `cfg` is used as given; validate it once at start-up with
/// [`IngestConfig::validate`] rather than on every call.
pub fn process(payload: &Value, cfg: &IngestConfig) -> Result<ProcessedRecord, IngestError> {
    TransactionPipeline {
        config: cfg.clone(),
        clock: Arc::new(SystemClock),
        observer: Arc::new(TracingObserver),
    }
    .process(payload)
}
