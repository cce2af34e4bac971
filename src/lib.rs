//! Mokpokpo
//!
//! Storefront core for a small agricultural products shop: catalog filtering, cart line
//! operations, order totals, order placement and role-based entry resolution for the
//! back-office dashboards.

pub mod access;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod utils;
