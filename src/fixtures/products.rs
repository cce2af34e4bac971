//! Product Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    config::parse_price,
    fixtures::FixtureError,
    products::{Category, Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product category tag (e.g., "medicinal-plants")
    pub category: Category,

    /// Product price (e.g., "2500 XOF")
    pub price: String,

    /// Whether the product can be bought
    #[serde(default = "default_available")]
    pub available: bool,

    /// Short description
    #[serde(default)]
    pub description: String,
}

fn default_available() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product::new(
            fixture.id,
            fixture.name,
            fixture.category,
            Money::from_minor(minor_units, currency),
        )
        .with_availability(fixture.available)
        .with_description(fixture.description))
    }
}
