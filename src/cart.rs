//! Cart
//!
//! Cart lines and the pure operations that update them. Every operation takes the current
//! lines by reference and returns a new vector; [`Cart`] is the caller-owned container that
//! applies them.

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    pricing::{OrderPricing, OrderSummary, PricingError, compute_order_summary},
    products::{Product, ProductId},
};

/// Errors related to cart lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line quantity must be between 1 and `u32::MAX`.
    #[error("invalid quantity {quantity} for product {product}")]
    InvalidQuantity {
        /// Product the quantity was given for
        product: ProductId,
        /// Rejected quantity
        quantity: i64,
    },

    /// A line's unit price must not be negative.
    #[error("invalid price {price} for product {product}")]
    InvalidPrice {
        /// Product the price was given for
        product: ProductId,
        /// Rejected price, in minor units
        price: i64,
    },

    /// The product is marked unavailable and cannot be bought.
    #[error("product {0} is unavailable")]
    ProductUnavailable(ProductId),

    /// A product or line is priced in a different currency from the cart (product, found, expected).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Two lines reference the same product.
    #[error("duplicate line for product {0}")]
    DuplicateLine(ProductId),
}

/// A product snapshot and quantity within a cart.
///
/// The quantity is always at least 1 and the unit price is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    product: ProductId,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a new line.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidPrice`]: `unit_price` is negative.
    /// - [`CartError::InvalidQuantity`]: `quantity` is below 1 or does not fit in a `u32`.
    pub fn new(
        product: ProductId,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
        quantity: i64,
    ) -> Result<Self, CartError> {
        if unit_price.is_negative() {
            return Err(CartError::InvalidPrice {
                product,
                price: unit_price.to_minor_units(),
            });
        }

        Ok(Self {
            product,
            name: name.into(),
            unit_price,
            quantity: checked_quantity(product, quantity)?,
        })
    }

    /// Create a line from a catalog product, snapshotting its name and price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ProductUnavailable`] if the product cannot be bought, or any
    /// error from [`CartLine::new`].
    pub fn from_product(product: &Product<'a>, quantity: i64) -> Result<Self, CartError> {
        if !product.is_purchasable() {
            return Err(CartError::ProductUnavailable(product.id));
        }

        Self::new(product.id, product.name.clone(), product.price, quantity)
    }

    /// Product id of the line
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Product name at the time it was added
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price at the time it was added
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Quantity, always at least 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money<'a, Currency>> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .map(|minor| Money::from_minor(minor, self.unit_price.currency()))
    }
}

fn checked_quantity(product: ProductId, quantity: i64) -> Result<u32, CartError> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or(CartError::InvalidQuantity { product, quantity })
}

/// Set the quantity of the line for `product`.
///
/// A quantity of zero or below removes the line. Lines for other products, and the order of
/// all lines, are left unchanged. Unknown products are ignored.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] if `new_quantity` does not fit in a `u32`.
pub fn set_quantity<'a>(
    lines: &[CartLine<'a>],
    product: ProductId,
    new_quantity: i64,
) -> Result<Vec<CartLine<'a>>, CartError> {
    if new_quantity <= 0 {
        return Ok(remove_line(lines, product));
    }

    let quantity = checked_quantity(product, new_quantity)?;

    Ok(lines
        .iter()
        .map(|line| {
            if line.product == product {
                CartLine {
                    quantity,
                    ..line.clone()
                }
            } else {
                line.clone()
            }
        })
        .collect())
}

/// Remove the line for `product`, if there is one.
pub fn remove_line<'a>(lines: &[CartLine<'a>], product: ProductId) -> Vec<CartLine<'a>> {
    lines
        .iter()
        .filter(|line| line.product != product)
        .cloned()
        .collect()
}

/// Add `quantity` units of `product`.
///
/// An existing line keeps its price snapshot and has its quantity increased; otherwise a new
/// line is appended.
///
/// # Errors
///
/// - [`CartError::ProductUnavailable`]: the product cannot be bought.
/// - [`CartError::InvalidQuantity`]: `quantity` is below 1, or the new line quantity does
///   not fit in a `u32`.
pub fn add_product<'a>(
    lines: &[CartLine<'a>],
    product: &Product<'a>,
    quantity: i64,
) -> Result<Vec<CartLine<'a>>, CartError> {
    if !product.is_purchasable() {
        return Err(CartError::ProductUnavailable(product.id));
    }

    let added = checked_quantity(product.id, quantity)?;

    let Some(existing) = lines.iter().find(|line| line.product == product.id) else {
        let mut updated = lines.to_vec();
        updated.push(CartLine::from_product(product, quantity)?);

        return Ok(updated);
    };

    let combined = i64::from(existing.quantity) + i64::from(added);

    set_quantity(lines, product.id, combined)
}

/// Cart
///
/// Caller-owned cart state. Every mutation goes through the pure line operations and replaces
/// the lines wholesale.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if a line is priced in another currency, or
    /// [`CartError::DuplicateLine`] if two lines share a product.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();
        let mut seen = FxHashSet::default();

        lines.iter().try_for_each(|line| {
            check_currency(line.product, line.unit_price(), currency)?;

            if seen.insert(line.product) {
                Ok(())
            } else {
                Err(CartError::DuplicateLine(line.product))
            }
        })?;

        Ok(Cart { lines, currency })
    }

    /// Add units of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is unavailable, priced in another currency, or
    /// the quantity is invalid.
    pub fn add(&mut self, product: &Product<'a>, quantity: i64) -> Result<(), CartError> {
        check_currency(product.id, &product.price, self.currency)?;

        self.lines = add_product(&self.lines, product, quantity).inspect_err(|err| {
            warn!(product = product.id.get(), %err, "rejected cart addition");
        })?;

        debug!(product = product.id.get(), quantity, lines = self.lines.len(), "added to cart");

        Ok(())
    }

    /// Set the quantity for a product; zero or below removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if the quantity does not fit in a `u32`.
    pub fn set_quantity(&mut self, product: ProductId, quantity: i64) -> Result<(), CartError> {
        self.lines = set_quantity(&self.lines, product, quantity)?;

        debug!(product = product.get(), quantity, "set cart quantity");

        Ok(())
    }

    /// Increase the quantity of a line by one. Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if the quantity would exceed `u32::MAX`.
    pub fn increment(&mut self, product: ProductId) -> Result<(), CartError> {
        match self.quantity_of(product) {
            Some(quantity) => self.set_quantity(product, i64::from(quantity) + 1),
            None => Ok(()),
        }
    }

    /// Decrease the quantity of a line by one, removing it when it reaches zero.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Cart::set_quantity`].
    pub fn decrement(&mut self, product: ProductId) -> Result<(), CartError> {
        match self.quantity_of(product) {
            Some(quantity) => self.set_quantity(product, i64::from(quantity) - 1),
            None => Ok(()),
        }
    }

    /// Remove the line for a product.
    pub fn remove(&mut self, product: ProductId) {
        self.lines = remove_line(&self.lines, product);

        debug!(product = product.get(), "removed from cart");
    }

    /// Compute the order summary for the current lines.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the pricing currency differs or a total overflows.
    pub fn summary(&self, pricing: &OrderPricing<'a>) -> Result<OrderSummary<'a>, PricingError> {
        compute_order_summary(&self.lines, pricing)
    }

    /// Quantity of a product in the cart, if present.
    pub fn quantity_of(&self, product: ProductId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product == product)
            .map(CartLine::quantity)
    }

    /// Lines in the order they were added.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn check_currency(
    product: ProductId,
    price: &Money<'_, Currency>,
    currency: &'static Currency,
) -> Result<(), CartError> {
    let price_currency = price.currency();

    if price_currency == currency {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch(
            product,
            price_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, XOF};
    use testresult::TestResult;

    use crate::products::Category;

    use super::*;

    fn id(raw: u32) -> ProductId {
        ProductId::new(raw).expect("test ids are positive")
    }

    fn test_lines<'a>() -> Result<Vec<CartLine<'a>>, CartError> {
        Ok(vec![
            CartLine::new(id(1), "Menthe Poivrée", Money::from_minor(2500, XOF), 2)?,
            CartLine::new(id(3), "Basilic Sacré", Money::from_minor(2000, XOF), 1)?,
            CartLine::new(id(5), "Aloe Vera", Money::from_minor(5000, XOF), 4)?,
        ])
    }

    fn quantities(lines: &[CartLine<'_>]) -> Vec<(u32, u32)> {
        lines
            .iter()
            .map(|line| (line.product().get(), line.quantity()))
            .collect()
    }

    fn product<'a>(raw: u32, price: i64) -> Product<'a> {
        Product::new(
            id(raw),
            format!("product {raw}"),
            Category::Spices,
            Money::from_minor(price, XOF),
        )
    }

    #[test]
    fn new_rejects_zero_and_negative_quantities() {
        for quantity in [0, -1, -5] {
            let result = CartLine::new(id(1), "x", Money::from_minor(100, XOF), quantity);

            assert_eq!(
                result,
                Err(CartError::InvalidQuantity {
                    product: id(1),
                    quantity
                })
            );
        }
    }

    #[test]
    fn new_rejects_negative_price() {
        let result = CartLine::new(id(1), "x", Money::from_minor(-100, XOF), 1);

        assert_eq!(
            result,
            Err(CartError::InvalidPrice {
                product: id(1),
                price: -100
            })
        );
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() -> TestResult {
        let line = CartLine::new(id(1), "x", Money::from_minor(2500, XOF), 3)?;

        assert_eq!(line.line_total(), Some(Money::from_minor(7500, XOF)));

        Ok(())
    }

    #[test]
    fn set_quantity_replaces_only_matching_line() -> TestResult {
        let lines = test_lines()?;

        let updated = set_quantity(&lines, id(3), 7)?;

        assert_eq!(quantities(&updated), vec![(1, 2), (3, 7), (5, 4)]);
        assert_eq!(quantities(&lines), vec![(1, 2), (3, 1), (5, 4)]);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_or_negative_removes_line() -> TestResult {
        let lines = test_lines()?;

        for quantity in [0, -5] {
            let updated = set_quantity(&lines, id(3), quantity)?;

            assert_eq!(quantities(&updated), vec![(1, 2), (5, 4)]);
        }

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_product_is_noop() -> TestResult {
        let lines = test_lines()?;

        assert_eq!(set_quantity(&lines, id(42), 3)?, lines);

        Ok(())
    }

    #[test]
    fn set_quantity_rejects_quantities_above_u32() -> TestResult {
        let lines = test_lines()?;
        let quantity = i64::from(u32::MAX) + 1;

        assert_eq!(
            set_quantity(&lines, id(1), quantity),
            Err(CartError::InvalidQuantity {
                product: id(1),
                quantity
            })
        );

        Ok(())
    }

    #[test]
    fn remove_line_removes_matching_line() -> TestResult {
        let lines = test_lines()?;

        assert_eq!(quantities(&remove_line(&lines, id(1))), vec![(3, 1), (5, 4)]);

        Ok(())
    }

    #[test]
    fn remove_line_unknown_product_returns_equal_lines() -> TestResult {
        let lines = test_lines()?;

        assert_eq!(remove_line(&lines, id(42)), lines);

        Ok(())
    }

    #[test]
    fn add_product_appends_snapshot() -> TestResult {
        let lines = test_lines()?;

        let updated = add_product(&lines, &product(8, 2800), 1)?;

        assert_eq!(quantities(&updated), vec![(1, 2), (3, 1), (5, 4), (8, 1)]);
        assert_eq!(
            updated.last().map(CartLine::unit_price),
            Some(&Money::from_minor(2800, XOF))
        );

        Ok(())
    }

    #[test]
    fn add_product_merges_and_keeps_price_snapshot() -> TestResult {
        let lines = test_lines()?;

        let repriced = product(1, 9999);
        let updated = add_product(&lines, &repriced, 3)?;

        assert_eq!(quantities(&updated), vec![(1, 5), (3, 1), (5, 4)]);
        assert_eq!(
            updated.first().map(CartLine::unit_price),
            Some(&Money::from_minor(2500, XOF))
        );

        Ok(())
    }

    #[test]
    fn add_product_rejects_unavailable() -> TestResult {
        let lines = test_lines()?;
        let unavailable = product(7, 1500).with_availability(false);

        assert_eq!(
            add_product(&lines, &unavailable, 1),
            Err(CartError::ProductUnavailable(id(7)))
        );

        Ok(())
    }

    #[test]
    fn cart_increment_and_decrement() -> TestResult {
        let mut cart = Cart::with_lines(test_lines()?, XOF)?;

        cart.increment(id(3))?;
        assert_eq!(cart.quantity_of(id(3)), Some(2));

        cart.decrement(id(3))?;
        cart.decrement(id(3))?;
        assert_eq!(cart.quantity_of(id(3)), None);
        assert_eq!(cart.len(), 2);

        cart.increment(id(42))?;
        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[test]
    fn cart_add_rejects_other_currency() {
        let mut cart = Cart::new(XOF);
        let product = Product::new(id(1), "x", Category::Spices, Money::from_minor(100, EUR));

        assert_eq!(
            cart.add(&product, 1),
            Err(CartError::CurrencyMismatch(
                id(1),
                EUR.iso_alpha_code,
                XOF.iso_alpha_code
            ))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn with_lines_rejects_two_lines_for_one_product() -> TestResult {
        let lines = vec![
            CartLine::new(id(1), "Menthe Poivrée", Money::from_minor(2500, XOF), 2)?,
            CartLine::new(id(1), "Menthe Poivrée", Money::from_minor(2500, XOF), 3)?,
        ];

        let result = Cart::with_lines(lines, XOF);

        assert!(matches!(result, Err(CartError::DuplicateLine(product)) if product == id(1)));

        Ok(())
    }

    #[test]
    fn with_lines_accepts_distinct_products() -> TestResult {
        let cart = Cart::with_lines(test_lines()?, XOF)?;

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.quantity_of(id(1)), Some(2));
        assert_eq!(cart.item_count(), 7);

        Ok(())
    }

    #[test]
    fn cart_item_count_sums_quantities() -> TestResult {
        let mut cart = Cart::with_lines(test_lines()?, XOF)?;

        assert_eq!(cart.item_count(), 7);

        cart.remove(id(5));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn cart_summary_uses_current_lines() -> TestResult {
        let mut cart = Cart::with_lines(test_lines()?, XOF)?;
        cart.remove(id(5));

        let summary = cart.summary(&OrderPricing::default())?;

        assert_eq!(summary.total(), Money::from_minor(9350, XOF));

        Ok(())
    }
}
