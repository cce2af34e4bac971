//! Products

use std::{fmt, num::NonZeroU32, str::FromStr};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to product identifiers and categories.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// Product identifiers must be positive.
    #[error("invalid product id {0}; ids must be positive")]
    InvalidId(u32),

    /// The category tag is not one of the known categories.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProductId(NonZeroU32);

impl ProductId {
    /// Create a product id from a raw integer.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidId`] if `id` is zero.
    pub fn new(id: u32) -> Result<Self, ProductError> {
        NonZeroU32::new(id)
            .map(Self)
            .ok_or(ProductError::InvalidId(id))
    }

    /// Raw integer value of the id.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for ProductId {
    type Error = ProductError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.get()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Medicinal plants
    MedicinalPlants,

    /// Aromatic herbs
    AromaticHerbs,

    /// Superfoods
    Superfoods,

    /// Spices
    Spices,
}

impl Category {
    /// Every category, in sidebar order.
    pub const ALL: [Category; 4] = [
        Category::MedicinalPlants,
        Category::AromaticHerbs,
        Category::Superfoods,
        Category::Spices,
    ];

    /// Wire tag for the category.
    pub fn tag(self) -> &'static str {
        match self {
            Category::MedicinalPlants => "medicinal-plants",
            Category::AromaticHerbs => "aromatic-herbs",
            Category::Superfoods => "superfoods",
            Category::Spices => "spices",
        }
    }

    /// Display label shown in the storefront.
    pub fn label(self) -> &'static str {
        match self {
            Category::MedicinalPlants => "Plantes Médicinales",
            Category::AromaticHerbs => "Herbes Aromatiques",
            Category::Superfoods => "Superaliments",
            Category::Spices => "Épices",
        }
    }
}

impl FromStr for Category {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.tag() == s)
            .ok_or_else(|| ProductError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product category
    pub category: Category,

    /// Product price
    pub price: Money<'a, Currency>,

    /// Whether the product can currently be purchased
    pub available: bool,

    /// Short description
    pub description: String,
}

impl<'a> Product<'a> {
    /// Create an available product with an empty description.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: Category,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            price,
            available: true,
            description: String::new(),
        }
    }

    /// Set the availability flag.
    #[must_use]
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the product may be added to a cart.
    pub fn is_purchasable(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::XOF;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_id_rejects_zero() {
        assert_eq!(ProductId::new(0), Err(ProductError::InvalidId(0)));
    }

    #[test]
    fn product_id_round_trips_through_u32() -> TestResult {
        let id = ProductId::new(7)?;

        assert_eq!(u32::from(id), 7);
        assert_eq!(id.to_string(), "7");

        Ok(())
    }

    #[test]
    fn category_parses_known_tags() -> TestResult {
        for category in Category::ALL {
            assert_eq!(category.tag().parse::<Category>()?, category);
        }

        Ok(())
    }

    #[test]
    fn category_rejects_unknown_tag() {
        let result = "houseplants".parse::<Category>();

        assert_eq!(
            result,
            Err(ProductError::UnknownCategory("houseplants".to_string()))
        );
    }

    #[test]
    fn unavailable_product_is_not_purchasable() -> TestResult {
        let product = Product::new(
            ProductId::new(7)?,
            "Coriandre Frais",
            Category::AromaticHerbs,
            Money::from_minor(1500, XOF),
        )
        .with_availability(false);

        assert!(!product.is_purchasable());

        Ok(())
    }
}
