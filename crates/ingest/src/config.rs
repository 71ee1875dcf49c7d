//! Configuration types for the transaction pipeline.
//!
//! [`IngestConfig`] controls the tunable parts of enrichment (tax rate and
//! rounding scale) and how strictly line items are checked. It is cheap to
//! clone and deserializes from any serde format, so the server can embed it
//! in its own configuration file.
//!
//! # Quick Start
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! config.validate().expect("default config is valid");
//! assert_eq!(config.tax_rate.to_string(), "0.07");
//! ```
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on [`IngestConfig::tax_scale`]. Currency math past this many
/// decimal places is never meaningful.
pub const MAX_TAX_SCALE: u32 = 10;

/// Runtime configuration for the transaction pipeline.
///
/// # Serialization
///
/// ```toml
/// [ingest]
/// version = 1
/// tax_rate = "0.07"
/// tax_scale = 2
/// item_policy = "permissive"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// Version of the configuration layout.
    ///
    /// Default: `1`
    pub version: u32,

    /// Fraction of `total_amount` charged as tax.
    ///
    /// Must lie in `[0, 1)`.
    ///
    /// Default: `0.07`
    pub tax_rate: Decimal,

    /// Number of decimal places `total_tax` is rounded to, half away from zero.
    ///
    /// Default: `2`
    pub tax_scale: u32,

    /// How much beyond key presence is checked on each line item.
    ///
    /// Default: [`ItemPolicy::Permissive`]
    pub item_policy: ItemPolicy,
}

/// Line item checking policy.
///
/// Both policies require every item to be an object with `name`, `price` and
/// `quantity` keys. Only `Strict` inspects the values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemPolicy {
    /// Key presence only. Negative or non-numeric quantities pass through.
    #[default]
    Permissive,
    /// `name` must be a string, `price` and `quantity` non-negative numbers.
    Strict,
}

/// Errors raised by [`IngestConfig::validate`].
///
/// These are start-up problems; they should stop the process before it
/// accepts traffic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("tax_rate ({0}) must be at least 0 and below 1")]
    TaxRateOutOfRange(Decimal),

    #[error("tax_scale ({scale}) exceeds the maximum of {max}")]
    TaxScaleTooLarge { scale: u32, max: u32 },

    #[error("unsupported config version {0}")]
    UnsupportedVersion(u32),
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            tax_rate: Decimal::new(7, 2),
            tax_scale: 2,
            item_policy: ItemPolicy::Permissive,
        }
    }
}

impl IngestConfig {
    /// Validates internal consistency of this configuration.
    ///
    /// ```rust
    /// use ingest::IngestConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let bad = IngestConfig {
    ///     tax_rate: Decimal::ONE,
    ///     ..Default::default()
    /// };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.tax_rate.is_sign_negative() || self.tax_rate >= Decimal::ONE {
            return Err(ConfigError::TaxRateOutOfRange(self.tax_rate));
        }
        if self.tax_scale > MAX_TAX_SCALE {
            return Err(ConfigError::TaxScaleTooLarge {
                scale: self.tax_scale,
                max: MAX_TAX_SCALE,
            });
        }
        Ok(())
    }
}
