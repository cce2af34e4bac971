//! Cart Fixtures

use serde::Deserialize;

use crate::products::ProductId;

/// Wrapper for the initial cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in the order they were added
    pub lines: Vec<CartLineFixture>,
}

/// A product reference and quantity
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Catalog product id
    pub product: ProductId,

    /// Number of units
    pub quantity: i64,
}
