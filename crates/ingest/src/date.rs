//! Transaction date parsing and the non-future rule.
//!
//! Dates must be exactly `YYYY-MM-DD`. The shape is checked byte by byte
//! before chrono parses it, because chrono accepts unpadded months and days
//! and signed or wider years, none of which are valid here.
use chrono::NaiveDate;

use crate::error::IngestError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_transaction_date(raw: &str) -> Result<NaiveDate, IngestError> {
    if !has_iso_date_shape(raw) {
        return Err(IngestError::InvalidDateFormat);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| IngestError::InvalidDateFormat)
}

/// Parses `raw` and rejects dates strictly after `today`.
///
/// The comparison is by calendar date only, so a transaction dated today
/// passes at any time of day.
pub fn normalize_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, IngestError> {
    let date = parse_transaction_date(raw)?;
    if date > today {
        return Err(IngestError::FutureDate);
    }
    Ok(date)
}

fn has_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
