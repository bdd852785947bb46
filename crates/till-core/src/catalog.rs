//! # Catalog Filter
//!
//! Derives the product grid from the full product list, the search text and
//! the category selector.
//!
//! ```text
//! products ──► category == selected? ──► name/SKU contains query? ──► grid
//!              (skipped for "all")        (skipped for empty query)
//! ```
//!
//! Both filters compose with AND and the input order is preserved. The
//! filter is pure and cheap, so callers re-run it whenever the products,
//! the query or the category change.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{EntityId, Product};

/// Category selector of the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EntityId),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => product.category_id() == Some(*id),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<EntityId>()
            .map(CategoryFilter::Only)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("expected a category id or 'all', got '{}'", s),
            })
    }
}

/// Case-insensitive substring match against product name or SKU.
pub fn matches_query(product: &Product, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product
            .sku
            .as_deref()
            .is_some_and(|sku| sku.to_lowercase().contains(&needle))
}

/// Returns the displayed subset of `products`, in input order.
pub fn filter_products(products: &[Product], query: &str, category: CategoryFilter) -> Vec<Product> {
    products
        .iter()
        .filter(|p| category.matches(p))
        .filter(|p| matches_query(p, query))
        .cloned()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
