//! Fixtures
//!
//! Seed data for the storefront, read from YAML under a base directory:
//!
//! - `products/<name>.yml`: the catalog
//! - `carts/<name>.yml`: an initial cart referencing catalog products
//! - `config/<name>.yml`: the store configuration

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    config::{ConfigError, StoreConfig},
    fixtures::{carts::CartFixture, products::ProductsFixture},
    pricing::OrderPricing,
    products::{Product, ProductId},
};

pub mod carts;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Price, percentage or currency error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog construction error
    #[error("Failed to create catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart construction error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),

    /// A cart line references a product missing from the catalog
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The fixture set defines no products
    #[error("No products loaded; currency unknown")]
    NoProducts,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Option<Catalog<'static>>,
    cart: Option<Cart<'static>>,
    config: Option<StoreConfig>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            cart: None,
            config: None,
        }
    }

    /// Load the catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if it defines no products, or
    /// if the products do not form a valid catalog.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(FixtureError::NoProducts)?;

        debug!(set = name, products = products.len(), "loaded product fixtures");

        let catalog = Catalog::with_products(products, currency)?;

        if let Some(config) = &self.config {
            check_config_currency(config, &catalog)?;
        }

        self.catalog = Some(catalog);

        Ok(self)
    }

    /// Load the initial cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if no products are loaded, or
    /// if a line references an unknown or unavailable product.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        let catalog = self.catalog.as_ref().ok_or(FixtureError::NoProducts)?;
        let mut cart = Cart::new(catalog.currency());

        for line in fixture.lines {
            let product = catalog
                .get(line.product)
                .map_err(|_err| FixtureError::ProductNotFound(line.product))?;

            cart.add(product, line.quantity)?;
        }

        debug!(set = name, lines = cart.len(), "loaded cart fixture");

        self.cart = Some(cart);

        Ok(self)
    }

    /// Load the store configuration from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, or if its currency differs
    /// from the currency of already loaded products.
    pub fn load_config(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("config").join(format!("{name}.yml"));
        let config = StoreConfig::load(file_path)?;

        if let Some(catalog) = &self.catalog {
            check_config_currency(&config, catalog)?;
        }

        self.config = Some(config);

        Ok(self)
    }

    /// Load a complete fixture set (products, cart and config with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_cart(name)?
            .load_config(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'static>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// Get a copy of the loaded cart, or an empty cart in the catalog currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn cart(&self) -> Result<Cart<'static>, FixtureError> {
        match &self.cart {
            Some(cart) => Ok(cart.clone()),
            None => Ok(Cart::new(self.catalog()?.currency())),
        }
    }

    /// Get the loaded store configuration, or the default one
    pub fn config(&self) -> StoreConfig {
        self.config.unwrap_or_default()
    }

    /// Pricing settings from the store configuration
    pub fn pricing(&self) -> OrderPricing<'static> {
        self.config().pricing()
    }
}

fn check_config_currency(config: &StoreConfig, catalog: &Catalog<'_>) -> Result<(), ConfigError> {
    if config.currency == catalog.currency() {
        Ok(())
    } else {
        Err(ConfigError::CurrencyMismatch(
            catalog.currency().iso_alpha_code.to_string(),
            config.currency.iso_alpha_code.to_string(),
        ))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
