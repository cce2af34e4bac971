//! Mokpokpo prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    access::{AccessError, Area, Entry, Role, Session, User, resolve_entry},
    cart::{Cart, CartError, CartLine, add_product, remove_line, set_quantity},
    catalog::{Catalog, CatalogError, CatalogFilter, filter_catalog},
    config::{ConfigError, StoreConfig},
    fixtures::{Fixture, FixtureError},
    orders::{Order, OrderError, OrderStatus, place_order},
    pricing::{OrderPricing, OrderSummary, PricingError, compute_order_summary},
    products::{Category, Product, ProductError, ProductId},
    receipt::{Receipt, ReceiptError},
};
