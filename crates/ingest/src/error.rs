//! Error types produced by the ingest crate.
//!
//! Every variant is a caller input error: the pipeline never fails for
//! infrastructure reasons, so all of these map to HTTP 400. Server-side
//! failures (persistence, unexpected faults) live in the server crate.
//!
//! # Error Categories
//!
//! | Error | Stage | Message |
//! |-------|-------|---------|
//! | [`MalformedPayload`](IngestError::MalformedPayload) | Schema | Invalid JSON payload |
//! | [`MissingField`](IngestError::MissingField) | Schema | Missing required field: {field} |
//! | [`ItemsNotAList`](IngestError::ItemsNotAList) | Schema | 'items' must be a list |
//! | [`InvalidItem`](IngestError::InvalidItem) | Schema | Each item must include ... |
//! | [`InvalidItemField`](IngestError::InvalidItemField) | Schema | strict item policy violation |
//! | [`InvalidAmountType`](IngestError::InvalidAmountType) | Schema | 'total_amount' must be a number |
//! | [`AmountOutOfRange`](IngestError::AmountOutOfRange) | Schema | 'total_amount' is out of range |
//! | [`InvalidFieldType`](IngestError::InvalidFieldType) | Schema | '{field}' must be a string |
//! | [`InvalidDateFormat`](IngestError::InvalidDateFormat) | Date | Invalid date format, expected YYYY-MM-DD |
//! | [`FutureDate`](IngestError::FutureDate) | Date | Transaction date cannot be in the future |
//!
//! # Examples
//!
//! ```rust
//! use ingest::IngestError;
//!
//! let err = IngestError::MissingField("date");
//! assert_eq!(err.to_string(), "Missing required field: date");
//! assert_eq!(err.http_status_code(), 400);
//! ```
use thiserror::Error;

/// Rejection reasons for a transaction document.
///
/// The `Display` output is the exact message returned to callers, so the
/// wording of each `#[error]` attribute is part of the public contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The body is not a JSON object, or is an empty one.
    #[error("Invalid JSON payload")]
    MalformedPayload,

    /// One of the six required top-level keys is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// `items` is present but is not a JSON array.
    #[error("'items' must be a list")]
    ItemsNotAList,

    /// The item at `index` is not an object carrying `name`, `price` and `quantity`.
    #[error("Each item must include 'name', 'price', and 'quantity'")]
    InvalidItem { index: usize },

    /// Only raised under [`ItemPolicy::Strict`](crate::ItemPolicy::Strict).
    #[error("Item {index}: {reason}")]
    InvalidItemField {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },

    /// `total_amount` is a string, boolean, null, array or object.
    #[error("'total_amount' must be a number")]
    InvalidAmountType,

    /// `total_amount` is a number too large or too precise for currency math.
    #[error("'total_amount' is out of range")]
    AmountOutOfRange,

    /// A text field carries a non-string JSON value.
    #[error("'{0}' must be a string")]
    InvalidFieldType(&'static str),

    #[error("Invalid date format, expected YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("Transaction date cannot be in the future")]
    FutureDate,
}

impl IngestError {
    /// Returns true if this error indicates a client-side issue.
    ///
    /// All ingest errors are caller input errors. Kept for symmetry with the
    /// server error type, which also has server-side variants.
    pub fn is_client_error(&self) -> bool {
        true
    }

    /// Suggested HTTP status code for this rejection.
    ///
    /// ```rust
    /// use ingest::IngestError;
    ///
    /// assert_eq!(IngestError::FutureDate.http_status_code(), 400);
    /// assert_eq!(IngestError::MalformedPayload.http_status_code(), 400);
    /// ```
    pub fn http_status_code(&self) -> u16 {
        400
    }

    /// Name of the offending field, when the rejection is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IngestError::MalformedPayload => None,
            IngestError::MissingField(field) | IngestError::InvalidFieldType(field) => Some(*field),
            IngestError::ItemsNotAList | IngestError::InvalidItem { .. } => Some("items"),
            IngestError::InvalidItemField { field, .. } => Some(*field),
            IngestError::InvalidAmountType | IngestError::AmountOutOfRange => Some("total_amount"),
            IngestError::InvalidDateFormat | IngestError::FutureDate => Some("date"),
        }
    }

    /// Date rejections are logged at error severity, everything else at warning.
    pub fn is_date_error(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidDateFormat | IngestError::FutureDate
        )
    }

    /// Stable machine-readable tag, used as a metrics label.
    pub fn reason_code(&self) -> &'static str {
        match self {
            IngestError::MalformedPayload => "malformed_payload",
            IngestError::MissingField(_) => "missing_field",
            IngestError::ItemsNotAList => "items_not_a_list",
            IngestError::InvalidItem { .. } => "invalid_item",
            IngestError::InvalidItemField { .. } => "invalid_item_field",
            IngestError::InvalidAmountType => "invalid_amount_type",
            IngestError::AmountOutOfRange => "amount_out_of_range",
            IngestError::InvalidFieldType(_) => "invalid_field_type",
            IngestError::InvalidDateFormat => "invalid_date_format",
            IngestError::FutureDate => "future_date",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(
            IngestError::MissingField("transaction_id").to_string(),
            "Missing required field: transaction_id"
        );
        assert_eq!(
            IngestError::ItemsNotAList.to_string(),
            "'items' must be a list"
        );
        assert_eq!(
            IngestError::InvalidItem { index: 3 }.to_string(),
            "Each item must include 'name', 'price', and 'quantity'"
        );
        assert_eq!(
            IngestError::InvalidAmountType.to_string(),
            "'total_amount' must be a number"
        );
        assert_eq!(
            IngestError::InvalidDateFormat.to_string(),
            "Invalid date format, expected YYYY-MM-DD"
        );
        assert_eq!(
            IngestError::FutureDate.to_string(),
            "Transaction date cannot be in the future"
        );
        assert_eq!(
            IngestError::MalformedPayload.to_string(),
            "Invalid JSON payload"
        );
    }

    #[test]
    fn every_rejection_is_a_bad_request() {
        let errors = [
            IngestError::MalformedPayload,
            IngestError::MissingField("date"),
            IngestError::ItemsNotAList,
            IngestError::InvalidItem { index: 0 },
            IngestError::InvalidAmountType,
            IngestError::AmountOutOfRange,
            IngestError::InvalidFieldType("customer_name"),
            IngestError::InvalidDateFormat,
            IngestError::FutureDate,
        ];
        for err in errors {
            assert_eq!(err.http_status_code(), 400, "{err}");
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn field_and_severity_classification() {
        assert_eq!(IngestError::MissingField("items").field(), Some("items"));
        assert_eq!(IngestError::InvalidAmountType.field(), Some("total_amount"));
        assert_eq!(IngestError::MalformedPayload.field(), None);
        assert!(IngestError::FutureDate.is_date_error());
        assert!(!IngestError::ItemsNotAList.is_date_error());
        assert_eq!(IngestError::FutureDate.reason_code(), "future_date");
    }
}
