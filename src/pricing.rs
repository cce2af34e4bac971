//! Pricing
//!
//! Order totals for a cart: subtotal, flat shipping on non-empty carts, a fixed-rate tax on
//! the subtotal, and the grand total. The tax is the only rounded amount; it is rounded
//! half away from zero to whole minor units and then summed with the other amounts.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money, MoneyError,
    iso::{Currency, XOF},
};
use thiserror::Error;

use crate::cart::CartLine;

/// Flat shipping fee charged on non-empty carts, in minor units of [`XOF`].
pub const DEFAULT_SHIPPING_FEE_MINOR: i64 = 2000;

/// Tax rate applied to the subtotal.
pub const DEFAULT_TAX_RATE: f64 = 0.05;

/// Errors that can occur while calculating order totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line's currency differs from the pricing currency (index, line currency, pricing currency).
    #[error("Line {0} has currency {1}, but pricing uses currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An amount overflowed while summing or applying the tax rate.
    #[error("order total overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Shipping and tax settings used to total an order.
#[derive(Debug, Clone, Copy)]
pub struct OrderPricing<'a> {
    /// Flat fee applied when the subtotal is positive
    pub shipping_fee: Money<'a, Currency>,

    /// Fraction of the subtotal charged as tax
    pub tax_rate: Percentage,
}

impl<'a> OrderPricing<'a> {
    /// Create pricing settings.
    pub fn new(shipping_fee: Money<'a, Currency>, tax_rate: Percentage) -> Self {
        Self {
            shipping_fee,
            tax_rate,
        }
    }

    /// Currency every line must be priced in.
    pub fn currency(&self) -> &'a Currency {
        self.shipping_fee.currency()
    }
}

impl Default for OrderPricing<'static> {
    fn default() -> Self {
        Self::new(
            Money::from_minor(DEFAULT_SHIPPING_FEE_MINOR, XOF),
            Percentage::from(DEFAULT_TAX_RATE),
        )
    }
}

/// Derived totals for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary<'a> {
    subtotal: Money<'a, Currency>,
    shipping: Money<'a, Currency>,
    tax: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> OrderSummary<'a> {
    /// Sum of unit price times quantity over all lines
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Shipping fee, zero for an empty cart
    pub fn shipping(&self) -> Money<'a, Currency> {
        self.shipping
    }

    /// Tax on the subtotal, rounded to whole minor units
    pub fn tax(&self) -> Money<'a, Currency> {
        self.tax
    }

    /// Subtotal plus shipping plus tax
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Computes the order summary for the given lines.
///
/// # Errors
///
/// - [`PricingError::CurrencyMismatch`]: a line is priced in another currency.
/// - [`PricingError::Overflow`]: an amount does not fit in minor units.
pub fn compute_order_summary<'a>(
    lines: &[CartLine<'a>],
    pricing: &OrderPricing<'a>,
) -> Result<OrderSummary<'a>, PricingError> {
    let currency = pricing.currency();
    let subtotal_minor = subtotal_minor(lines, currency)?;

    let shipping_minor = if subtotal_minor > 0 {
        pricing.shipping_fee.to_minor_units()
    } else {
        0
    };

    let tax_minor = percent_of_minor(&pricing.tax_rate, subtotal_minor)?;

    let total_minor = subtotal_minor
        .checked_add(shipping_minor)
        .and_then(|sum| sum.checked_add(tax_minor))
        .ok_or(PricingError::Overflow)?;

    Ok(OrderSummary {
        subtotal: Money::from_minor(subtotal_minor, currency),
        shipping: Money::from_minor(shipping_minor, currency),
        tax: Money::from_minor(tax_minor, currency),
        total: Money::from_minor(total_minor, currency),
    })
}

/// Sum of line totals in minor units.
fn subtotal_minor(lines: &[CartLine<'_>], currency: &Currency) -> Result<i64, PricingError> {
    lines.iter().enumerate().try_fold(0_i64, |acc, (i, line)| {
        let line_currency = line.unit_price().currency();

        if line_currency != currency {
            return Err(PricingError::CurrencyMismatch(
                i,
                line_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        line.unit_price()
            .to_minor_units()
            .checked_mul(i64::from(line.quantity()))
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or(PricingError::Overflow)
    })
}

/// Apply a percentage to a minor unit amount, rounding half away from zero.
fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::Overflow)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::Overflow)
}
