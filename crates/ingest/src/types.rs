//! Core data model types for the ingest crate.
//!
//! ```text
//! serde_json::Value (loose, caller supplied)
//!        │ schema::validate_schema()
//!        ▼
//! TransactionRequest
//! ├── transaction_id: String
//! ├── date: String            (YYYY-MM-DD, checked by date stage)
//! ├── customer_name: String
//! ├── items: Vec<LineItem>    (name / price / quantity + extra keys)
//! ├── total_amount: Decimal
//! └── payment_method: String
//!        │ date → enrich → assemble
//!        ▼
//! ProcessedRecord (see record.rs)
//! ```
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The six keys every transaction document must carry, in check order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "transaction_id",
    "date",
    "customer_name",
    "items",
    "total_amount",
    "payment_method",
];

/// A transaction document after shape validation and typed decode.
///
/// The `date` is still the caller's string; the date stage parses it and the
/// record keeps the original text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRequest {
    pub transaction_id: String,
    pub date: String,
    pub customer_name: String,
    pub items: Vec<LineItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub payment_method: String,
}

/// One purchased line on a transaction.
///
/// Values are kept as raw JSON so items round-trip to the analytical store
/// exactly as the caller sent them. Keys beyond the required three are kept
/// in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub name: Value,
    pub price: Value,
    pub quantity: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    /// Splits a JSON object into the required keys and the remainder.
    ///
    /// Returns `None` when any required key is absent.
    pub(crate) fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let mut extra = object.clone();
        let name = extra.remove("name")?;
        let price = extra.remove("price")?;
        let quantity = extra.remove("quantity")?;
        Some(Self {
            name,
            price,
            quantity,
            extra,
        })
    }
}
