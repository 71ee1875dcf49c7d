//! The immutable record handed to the analytical store.
use rust_decimal::Decimal;
use serde::Serialize;

use crate::enrich::Enrichment;
use crate::types::{LineItem, TransactionRequest};

pub const STATUS_SUCCESS: &str = "success";
pub const SUCCESS_MESSAGE: &str = "Transaction processed and stored successfully";

/// A validated, enriched transaction row.
///
/// Built only by [`assemble`]; fields are read-only after construction.
/// Serializes to the row layout of the destination table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProcessedRecord {
    order_id: String,
    transaction_id: String,
    date: String,
    customer_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    total_tax: Decimal,
    payment_method: String,
    processed_at: String,
    items: Vec<LineItem>,
    status: &'static str,
    message: &'static str,
}

/// Composes a validated request and its enrichment into a record.
///
/// Items are moved over untouched.
pub fn assemble(request: TransactionRequest, enrichment: Enrichment) -> ProcessedRecord {
    let TransactionRequest {
        transaction_id,
        date,
        customer_name,
        items,
        total_amount,
        payment_method,
    } = request;
    let Enrichment {
        order_id,
        total_tax,
        processed_at,
    } = enrichment;

    ProcessedRecord {
        order_id: order_id.to_string(),
        transaction_id,
        date,
        customer_name,
        total_amount,
        total_tax,
        payment_method,
        processed_at,
        items,
        status: STATUS_SUCCESS,
        message: SUCCESS_MESSAGE,
    }
}

impl ProcessedRecord {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn total_tax(&self) -> Decimal {
        self.total_tax
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn processed_at(&self) -> &str {
        &self.processed_at
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn status(&self) -> &'static str {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}
