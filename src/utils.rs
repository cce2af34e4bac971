//! Utils

use std::path::PathBuf;

use clap::Parser;

use crate::products::Category;

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
pub struct StorefrontArgs {
    /// Fixture set to use for the catalog & cart
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Only list products in this category (e.g. "medicinal-plants")
    #[clap(short, long)]
    pub category: Option<Category>,

    /// Only list products whose name contains this text
    #[clap(short, long, default_value = "")]
    pub query: String,

    /// Store configuration file, overriding the fixture set's config
    #[clap(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_to_storefront_set_without_filters() -> TestResult {
        let args = StorefrontArgs::try_parse_from(["storefront"])?;

        assert_eq!(args.fixture, "storefront");
        assert_eq!(args.category, None);
        assert!(args.query.is_empty());
        assert!(args.config.is_none());

        Ok(())
    }

    #[test]
    fn parses_category_tag() -> TestResult {
        let args = StorefrontArgs::try_parse_from(["storefront", "-c", "spices", "-q", "cur"])?;

        assert_eq!(args.category, Some(Category::Spices));
        assert_eq!(args.query, "cur");

        Ok(())
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(StorefrontArgs::try_parse_from(["storefront", "-c", "flowers"]).is_err());
    }
}
