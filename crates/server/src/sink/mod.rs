//! Persistence collaborators for processed transaction records.
//!
//! A [`RecordSink`] appends one [`ProcessedRecord`] to a destination table
//! and reports the per-row errors the store returned. An empty list means the
//! row was stored. Transport faults are a separate [`SinkError`], so callers
//! can tell "the store refused the row" apart from "we never reached it".
//!
//! Sinks never retry.

mod bigquery;
mod memory;

pub use bigquery::{
    BigQuerySink, ErrorProto, InsertAllRequest, InsertAllResponse, InsertErrorEntry, InsertRow,
};
pub use memory::InMemorySink;

use async_trait::async_trait;
use ingest::ProcessedRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Appends processed records to a durable table.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Human-readable destination, for logs and readiness output.
    fn destination(&self) -> String;

    /// Append one row. `Ok(vec![])` on success.
    async fn insert(&self, record: &ProcessedRecord) -> Result<Vec<RowError>, SinkError>;
}

/// A row-level rejection reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub index: usize,
    pub reason: String,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {} ({})", self.index, self.message, self.reason)
    }
}

/// Failures reaching or talking to the store.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid table reference '{0}', expected project.dataset.table")]
    InvalidTable(String),

    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// A fully qualified `project.dataset.table` name.
///
/// Domain-scoped project ids (`example.com:project`) contain dots, so the
/// dataset and table are taken from the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn parse(raw: &str) -> Result<Self, SinkError> {
        let mut parts = raw.trim().rsplitn(3, '.');
        let (Some(table), Some(dataset), Some(project)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(SinkError::InvalidTable(raw.to_string()));
        };
        if [project, dataset, table].iter().any(|part| part.is_empty()) {
            return Err(SinkError::InvalidTable(raw.to_string()));
        }
        Ok(Self {
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        })
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}
