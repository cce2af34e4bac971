//! Store configuration
//!
//! Currency, shipping fee and tax rate, read from YAML:
//!
//! ```yaml
//! currency: XOF
//! shipping_fee: 2000 XOF
//! tax_rate: 5%
//! ```

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency, XOF},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::pricing::{DEFAULT_SHIPPING_FEE_MINOR, DEFAULT_TAX_RATE, OrderPricing};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// An amount or catalog is not in the store currency (expected, found)
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// Raw configuration as written in YAML.
#[derive(Debug, Deserialize)]
struct StoreConfigFile {
    currency: String,
    shipping_fee: String,
    tax_rate: String,
}

/// Store configuration
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    /// Currency of every price in the store
    pub currency: &'static Currency,

    /// Flat shipping fee for non-empty carts
    pub shipping_fee: Money<'static, Currency>,

    /// Tax rate applied to the subtotal
    pub tax_rate: Percentage,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: XOF,
            shipping_fee: Money::from_minor(DEFAULT_SHIPPING_FEE_MINOR, XOF),
            tax_rate: Percentage::from(DEFAULT_TAX_RATE),
        }
    }
}

impl StoreConfig {
    /// Load the configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        debug!(path = %path.display(), "loading store config");

        Self::from_yaml(&contents)
    }

    /// Parse the configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, an amount or percentage cannot be parsed,
    /// or the shipping fee is not in the store currency.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: StoreConfigFile = serde_norway::from_str(yaml)?;

        let currency = find_currency(file.currency.trim())?;
        let (shipping_minor, shipping_currency) = parse_price(&file.shipping_fee)?;

        if shipping_currency != currency {
            return Err(ConfigError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                shipping_currency.iso_alpha_code.to_string(),
            ));
        }

        if shipping_minor < 0 {
            return Err(ConfigError::InvalidPrice(file.shipping_fee));
        }

        Ok(Self {
            currency,
            shipping_fee: Money::from_minor(shipping_minor, currency),
            tax_rate: parse_percentage(&file.tax_rate)?,
        })
    }

    /// Pricing settings for order totals.
    pub fn pricing(&self) -> OrderPricing<'static> {
        OrderPricing::new(self.shipping_fee, self.tax_rate)
    }
}

fn find_currency(code: &str) -> Result<&'static Currency, ConfigError> {
    iso::find(code).ok_or_else(|| ConfigError::UnknownCurrency(code.to_string()))
}

/// Parse price string (e.g., "2500 XOF") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, has more precision than the
/// currency allows, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), ConfigError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ConfigError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| ConfigError::InvalidPrice(s.to_string()))?;

    let currency = find_currency(currency_code)?;

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(|| ConfigError::InvalidPrice(s.to_string()))?;

    let minor = amount
        .checked_mul(scale)
        .ok_or_else(|| ConfigError::InvalidPrice(s.to_string()))?;

    if minor.fract() != Decimal::ZERO {
        return Err(ConfigError::InvalidPrice(s.to_string()));
    }

    let minor_units = minor
        .to_i64()
        .ok_or_else(|| ConfigError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "5%" or "0.05") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the value is negative.
pub fn parse_percentage(s: &str) -> Result<Percentage, ConfigError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    }
    .map_err(|_err| ConfigError::InvalidPercentage(s.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(ConfigError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_uses_currency_exponent() -> TestResult {
        let (xof_minor, xof) = parse_price("2500 XOF")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(xof_minor, 2500);
        assert_eq!(xof, XOF);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_fractional_francs() {
        let result = parse_price("2500.5 XOF");

        assert!(matches!(result, Err(ConfigError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        for input in ["2500XOF", "2500", "2500 XOF extra", "abc XOF"] {
            let result = parse_price(input);

            assert!(
                matches!(result, Err(ConfigError::InvalidPrice(_))),
                "expected InvalidPrice for {input:?}"
            );
        }
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(ConfigError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("5%")?, Percentage::from(Decimal::new(5, 2)));
        assert_eq!(parse_percentage("0.05")?, Percentage::from(Decimal::new(5, 2)));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage_and_negatives() {
        assert!(matches!(
            parse_percentage("five"),
            Err(ConfigError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percentage("-5%"),
            Err(ConfigError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn from_yaml_reads_all_fields() -> TestResult {
        let config = StoreConfig::from_yaml(
            "currency: XOF\nshipping_fee: 1500 XOF\ntax_rate: 18%\n",
        )?;

        assert_eq!(config.currency, XOF);
        assert_eq!(config.shipping_fee, Money::from_minor(1500, XOF));
        assert_eq!(config.tax_rate, Percentage::from(Decimal::new(18, 2)));

        Ok(())
    }

    #[test]
    fn from_yaml_rejects_shipping_in_other_currency() {
        let result =
            StoreConfig::from_yaml("currency: XOF\nshipping_fee: 20 EUR\ntax_rate: 5%\n");

        assert!(matches!(result, Err(ConfigError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn load_reads_file_from_disk() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "currency: XOF\nshipping_fee: 2000 XOF\ntax_rate: \"0.05\"")?;

        let config = StoreConfig::load(file.path())?;

        assert_eq!(config.shipping_fee, Money::from_minor(2000, XOF));

        Ok(())
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = StoreConfig::load("does/not/exist.yml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn default_matches_default_pricing() {
        let config = StoreConfig::default();
        let pricing = OrderPricing::default();

        assert_eq!(config.pricing().shipping_fee, pricing.shipping_fee);
        assert_eq!(config.pricing().tax_rate, pricing.tax_rate);
    }
}
