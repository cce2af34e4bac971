//! Catalog

use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::products::{Category, Product, ProductId};

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency (index, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Two products share the same id.
    #[error("Duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// A product has a negative price.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// No product with this id exists in the catalog.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),
}

/// Category and free-text constraints applied to a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    category: Option<Category>,
    query: String,
    needle: String,
}

impl CatalogFilter {
    /// A filter that keeps every product.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a single category.
    #[must_use]
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    /// Set the search query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self.needle = self.query.to_lowercase();
        self
    }

    /// Only keep products in this category; `None` keeps every category.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Case-insensitive substring the product name must contain; empty matches everything.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the product satisfies both constraints.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        matches_category(product, self.category) && matches_needle(product, &self.needle)
    }

    /// Apply the filter to a product list, preserving order.
    pub fn apply<'p, 'a>(&self, products: &'p [Product<'a>]) -> Vec<&'p Product<'a>> {
        filter_by_needle(products, self.category, &self.needle)
    }
}

/// Returns the products matching `category` (if any) whose name contains `query`, ignoring case.
///
/// The result is a subsequence of `products` in the original order.
pub fn filter_catalog<'p, 'a>(
    products: &'p [Product<'a>],
    category: Option<Category>,
    query: &str,
) -> Vec<&'p Product<'a>> {
    filter_by_needle(products, category, &query.to_lowercase())
}

fn filter_by_needle<'p, 'a>(
    products: &'p [Product<'a>],
    category: Option<Category>,
    needle: &str,
) -> Vec<&'p Product<'a>> {
    let matched: Vec<&'p Product<'a>> = products
        .iter()
        .filter(|product| matches_category(product, category) && matches_needle(product, needle))
        .collect();

    debug!(
        category = category.map(Category::tag),
        query = needle,
        matched = matched.len(),
        total = products.len(),
        "filtered catalog"
    );

    matched
}

fn matches_category(product: &Product<'_>, category: Option<Category>) -> bool {
    category.is_none_or(|category| product.category == category)
}

/// `needle` must already be lowercased.
fn matches_needle(product: &Product<'_>, needle: &str) -> bool {
    needle.is_empty() || product.name.to_lowercase().contains(needle)
}

/// Catalog
///
/// An immutable, currency-checked list of products with unique ids.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: Vec<Product<'a>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            products: Vec::new(),
            currency,
        }
    }

    /// Create a catalog from the given products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a product has a different currency, a negative price, or
    /// an id already used by an earlier product.
    pub fn with_products(
        products: impl Into<Vec<Product<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products = products.into();
        let mut seen = FxHashSet::default();

        products.iter().enumerate().try_for_each(|(i, product)| {
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    i,
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }

            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }

            Ok(())
        })?;

        Ok(Catalog { products, currency })
    }

    /// Products matching the filter, in catalog order.
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&Product<'a>> {
        filter.apply(&self.products)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] if no product has this id.
    pub fn get(&self, id: ProductId) -> Result<&Product<'a>, CatalogError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Number of products in each category, in [`Category::ALL`] order.
    pub fn count_by_category(&self) -> [(Category, usize); 4] {
        Category::ALL.map(|category| {
            let count = self
                .products
                .iter()
                .filter(|product| product.category == category)
                .count();

            (category, count)
        })
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.iter()
    }

    /// All products as a slice.
    pub fn products(&self) -> &[Product<'a>] {
        &self.products
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency of every price in the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
