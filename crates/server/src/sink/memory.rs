use async_trait::async_trait;
use ingest::ProcessedRecord;
use std::sync::RwLock;

use super::{RecordSink, RowError, SinkError};

/// An in-memory sink using a `RwLock` around a `Vec`. Useful for tests and
/// local runs without a warehouse.
pub struct InMemorySink {
    name: String,
    records: RwLock<Vec<ProcessedRecord>>,
}

impl InMemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of everything inserted so far, in insert order.
    pub fn records(&self) -> Vec<ProcessedRecord> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl RecordSink for InMemorySink {
    fn destination(&self) -> String {
        self.name.clone()
    }

    async fn insert(&self, record: &ProcessedRecord) -> Result<Vec<RowError>, SinkError> {
        let mut guard = self
            .records
            .write()
            .map_err(|_| SinkError::Unavailable("in-memory sink lock poisoned".into()))?;
        guard.push(record.clone());
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn stores_records_in_order() {
        let sink = InMemorySink::default();
        assert!(sink.is_empty());

        let payload = json!({
            "transaction_id": "T1",
            "date": "2024-01-15",
            "customer_name": "Alice",
            "items": [],
            "total_amount": 10,
            "payment_method": "cash"
        });
        let first = ingest::process(&payload, &Default::default()).expect("valid payload");
        let second = ingest::process(&payload, &Default::default()).expect("valid payload");

        assert!(sink.insert(&first).await.expect("insert").is_empty());
        assert!(sink.insert(&second).await.expect("insert").is_empty());

        let stored = sink.records();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].order_id(), first.order_id());
        assert_eq!(stored[1].order_id(), second.order_id());
        assert_eq!(sink.destination(), "memory");
    }
}
