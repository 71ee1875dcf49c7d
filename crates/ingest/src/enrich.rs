//! Derived fields: tax, order id, processing timestamp.
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::config::IngestConfig;

/// `processed_at` layout: naive UTC, microsecond precision, no offset suffix.
pub const PROCESSED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Fields the pipeline adds to a validated transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub order_id: Uuid,
    pub total_tax: Decimal,
    pub processed_at: String,
}

/// Derives the enrichment for one document.
///
/// `now` is the instant the orchestrator read from its clock; it is not
/// re-read here.
pub fn enrich(total_amount: Decimal, now: DateTime<Utc>, cfg: &IngestConfig) -> Enrichment {
    Enrichment {
        order_id: Uuid::new_v4(),
        total_tax: compute_tax(total_amount, cfg),
        processed_at: format_processed_at(now),
    }
}

/// `total_amount * tax_rate`, rounded to `tax_scale` places, half away from zero.
///
/// The result carries at most `tax_scale` places. Rounding never adds
/// scale, so a product near the top of the `Decimal` range, which already
/// lost fractional digits to the 28-digit mantissa, keeps fewer places.
///
/// ```rust
/// use ingest::{compute_tax, IngestConfig};
/// use rust_decimal::Decimal;
///
/// let tax = compute_tax(Decimal::new(1998, 2), &IngestConfig::default());
/// assert_eq!(tax, Decimal::new(140, 2));
/// ```
pub fn compute_tax(total_amount: Decimal, cfg: &IngestConfig) -> Decimal {
    (total_amount * cfg.tax_rate)
        .round_dp_with_strategy(cfg.tax_scale, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_processed_at(now: DateTime<Utc>) -> String {
    now.naive_utc().format(PROCESSED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 15)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn tax_rounds_to_two_places() {
        let cfg = IngestConfig::default();
        assert_eq!(compute_tax(Decimal::new(1998, 2), &cfg), Decimal::new(140, 2));
        assert_eq!(compute_tax(Decimal::from(100), &cfg), Decimal::new(700, 2));
        assert_eq!(compute_tax(Decimal::ZERO, &cfg), Decimal::ZERO);
    }

    #[test]
    fn tax_midpoints_round_away_from_zero() {
        let cfg = IngestConfig::default();
        // 0.50 * 0.07 = 0.035
        assert_eq!(compute_tax(Decimal::new(50, 2), &cfg), Decimal::new(4, 2));
        assert_eq!(compute_tax(Decimal::new(-50, 2), &cfg), Decimal::new(-4, 2));
        // 1.50 * 0.07 = 0.105
        assert_eq!(compute_tax(Decimal::new(150, 2), &cfg), Decimal::new(11, 2));
    }

    #[test]
    fn tax_uses_configured_rate_and_scale() {
        let cfg = IngestConfig {
            tax_rate: Decimal::new(2, 1),
            tax_scale: 0,
            ..Default::default()
        };
        // 12.5 * 0.2 = 2.5 -> 3
        assert_eq!(compute_tax(Decimal::new(125, 1), &cfg), Decimal::from(3));
    }

    #[test]
    fn huge_amounts_keep_value_but_not_scale() {
        let cfg = IngestConfig::default();
        let amount = Decimal::from_str("79000000000000000000000000000").expect("decimal");
        let tax = compute_tax(amount, &cfg);
        assert_eq!(
            tax,
            Decimal::from_str("5530000000000000000000000000").expect("decimal")
        );
        assert!(tax.scale() < cfg.tax_scale);

        let ordinary = compute_tax(Decimal::new(1998, 2), &cfg);
        assert_eq!(ordinary.scale(), cfg.tax_scale);
    }

    #[test]
    fn processed_at_is_naive_utc_iso8601() {
        assert_eq!(format_processed_at(instant()), "2024-06-01T08:30:15.000000");
    }

    #[test]
    fn each_enrichment_gets_a_fresh_v4_order_id() {
        let cfg = IngestConfig::default();
        let a = enrich(Decimal::new(1998, 2), instant(), &cfg);
        let b = enrich(Decimal::new(1998, 2), instant(), &cfg);
        assert_ne!(a.order_id, b.order_id);
        assert_eq!(a.order_id.get_version_num(), 4);
        assert_eq!(a.total_tax, b.total_tax);
        assert_eq!(a.processed_at, b.processed_at);
    }
}
