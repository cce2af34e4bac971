//! Storefront Example
//!
//! Lists the catalog of a fixture set, places an order for its initial cart and prints the
//! order receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to only list one category and `-q` to search product names
//! Use `--config` to price the cart with another store configuration

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mokpokpo::{
    catalog::CatalogFilter, config::StoreConfig, fixtures::Fixture, orders::place_order,
    receipt::Receipt, utils::StorefrontArgs,
};

/// Storefront Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = StorefrontArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let catalog = fixture.catalog()?;

    let pricing = match args.config.as_deref() {
        Some(path) => StoreConfig::load(path)?.pricing(),
        None => fixture.pricing(),
    };

    println!("Categories:");

    for (category, count) in catalog.count_by_category() {
        println!("  {:<24} {count}", category.label());
    }

    let filter = CatalogFilter::all()
        .with_category(args.category)
        .with_query(args.query);

    let products = catalog.filter(&filter);

    println!("\nProducts ({} of {}):", products.len(), catalog.len());

    for product in products {
        let availability = if product.available { "" } else { " (indisponible)" };

        println!(
            "  #{:<3} {:<20} {:>10}{availability}",
            product.id,
            product.name,
            product.price.to_string()
        );
    }

    println!();

    let cart = fixture.cart()?;
    let order = place_order(&cart, &pricing)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_order(&order).write_to(&mut handle)?;

    writeln!(handle, "Status: {}", order.status())?;

    Ok(())
}
