//! Shape validation and typed decode of transaction documents.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! ```text
//! 1. payload is a non-empty object      → MalformedPayload
//! 2. required keys present (in order)   → MissingField
//! 3. items is an array                  → ItemsNotAList
//! 4. each item has name/price/quantity  → InvalidItem / InvalidItemField
//! 5. total_amount is a JSON number      → InvalidAmountType
//! 6. typed decode                       → InvalidFieldType / InvalidDateFormat / AmountOutOfRange
//! ```
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use crate::config::ItemPolicy;
use crate::error::IngestError;
use crate::types::{LineItem, TransactionRequest, REQUIRED_FIELDS};

/// Validates a loosely-typed document and decodes it into a [`TransactionRequest`].
pub fn validate_schema(
    payload: &Value,
    item_policy: ItemPolicy,
) -> Result<TransactionRequest, IngestError> {
    let object = match payload {
        Value::Object(object) if !object.is_empty() => object,
        _ => return Err(IngestError::MalformedPayload),
    };

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(IngestError::MissingField(field));
        }
    }

    let Some(raw_items) = object["items"].as_array() else {
        return Err(IngestError::ItemsNotAList);
    };
    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_item(index, item, item_policy))
        .collect::<Result<Vec<_>, _>>()?;

    let Value::Number(amount) = &object["total_amount"] else {
        return Err(IngestError::InvalidAmountType);
    };
    let total_amount = decimal_from_number(amount).ok_or(IngestError::AmountOutOfRange)?;

    Ok(TransactionRequest {
        transaction_id: string_field(object, "transaction_id")?,
        date: object["date"]
            .as_str()
            .map(str::to_owned)
            .ok_or(IngestError::InvalidDateFormat)?,
        customer_name: string_field(object, "customer_name")?,
        items,
        total_amount,
        payment_method: string_field(object, "payment_method")?,
    })
}

fn validate_item(index: usize, item: &Value, policy: ItemPolicy) -> Result<LineItem, IngestError> {
    let line = item
        .as_object()
        .and_then(LineItem::from_object)
        .ok_or(IngestError::InvalidItem { index })?;

    if policy == ItemPolicy::Strict {
        if !line.name.is_string() {
            return Err(IngestError::InvalidItemField {
                index,
                field: "name",
                reason: "'name' must be a string",
            });
        }
        if !is_non_negative_number(&line.price) {
            return Err(IngestError::InvalidItemField {
                index,
                field: "price",
                reason: "'price' must be a non-negative number",
            });
        }
        if !is_non_negative_number(&line.quantity) {
            return Err(IngestError::InvalidItemField {
                index,
                field: "quantity",
                reason: "'quantity' must be a non-negative number",
            });
        }
    }

    Ok(line)
}

fn is_non_negative_number(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n >= 0.0)
}

fn string_field(object: &Map<String, Value>, field: &'static str) -> Result<String, IngestError> {
    object[field]
        .as_str()
        .map(str::to_owned)
        .ok_or(IngestError::InvalidFieldType(field))
}

/// Integers convert exactly. Floats go through their shortest round-trip
/// text form so `19.98` becomes exactly `19.98`, not the nearest binary value.
fn decimal_from_number(number: &Number) -> Option<Decimal> {
    if let Some(n) = number.as_i64() {
        return Some(Decimal::from(n));
    }
    if let Some(n) = number.as_u64() {
        return Some(Decimal::from(n));
    }
    let float = number.as_f64()?;
    if !float.is_finite() {
        return None;
    }
    Decimal::from_str(&float.to_string()).ok()
}
