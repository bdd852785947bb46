//! # Catalog State
//!
//! What the product grid shows: the store's products and categories, the
//! search text and the selected category, plus whether loading worked.
//!
//! ```text
//!           load()
//! LOADING ─────────┬──► READY      (products loaded; categories may be empty)
//!                  ├──► NO_STORE   (store lookup answered 400/404)
//!                  └──► ERROR      (profile, store or products failed)
//! ```

use till_core::{filter_products, Category, CategoryFilter, CoreError, EntityId, Product, Store};

/// Load state of the checkout screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    Loading,
    /// The user has no store yet; onboarding, not a failure.
    NoStore,
    Ready,
    Error(String),
}

#[derive(Debug, Default)]
pub struct CatalogState {
    screen: ScreenState,
    store: Option<Store>,
    products: Vec<Product>,
    categories: Vec<Category>,
    query: String,
    category: CategoryFilter,
}

impl CatalogState {
    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn set_screen(&mut self, screen: ScreenState) {
        self.screen = screen;
    }

    pub fn is_ready(&self) -> bool {
        self.screen == ScreenState::Ready
    }

    pub fn store(&self) -> Option<&Store> {
        self.store.as_ref()
    }

    pub fn set_store(&mut self, store: Option<Store>) {
        self.store = store;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Replaces both lists wholesale; last write wins.
    pub fn replace(&mut self, products: Vec<Product>, categories: Vec<Category>) {
        self.products = products;
        self.categories = categories;
        if let CategoryFilter::Only(id) = self.category {
            if !self.categories.iter().any(|c| c.id == id) {
                self.category = CategoryFilter::All;
            }
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    /// Selects a category. Only the store's own categories can be chosen.
    pub fn set_category(&mut self, filter: CategoryFilter) -> Result<(), CoreError> {
        if let CategoryFilter::Only(id) = filter {
            if !self.categories.iter().any(|c| c.id == id) {
                return Err(CoreError::CategoryNotFound(id));
            }
        }
        self.category = filter;
        Ok(())
    }

    pub fn product(&self, id: EntityId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The product grid under the current search text and category.
    pub fn visible(&self) -> Vec<Product> {
        filter_products(&self.products, &self.query, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: EntityId, name: &str, category: Option<EntityId>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "category": category.map(|c| serde_json::json!({ "id": c })),
        }))
        .unwrap()
    }

    fn category(id: EntityId, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            store_id: None,
        }
    }

    #[test]
    fn test_visible_applies_query_and_category() {
        let mut state = CatalogState::default();
        state.replace(
            vec![product(1, "Tea", Some(1)), product(2, "Teacake", Some(2)), product(3, "Bun", Some(2))],
            vec![category(1, "Drinks"), category(2, "Bakery")],
        );

        state.set_query("tea");
        assert_eq!(state.visible().len(), 2);

        state.set_category(CategoryFilter::Only(2)).unwrap();
        let ids: Vec<_> = state.visible().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut state = CatalogState::default();
        state.replace(vec![], vec![category(1, "Drinks")]);
        assert!(matches!(
            state.set_category(CategoryFilter::Only(9)),
            Err(CoreError::CategoryNotFound(9))
        ));
        assert_eq!(state.category(), CategoryFilter::All);
    }

    #[test]
    fn test_reload_drops_vanished_category() {
        let mut state = CatalogState::default();
        state.replace(vec![], vec![category(1, "Drinks")]);
        state.set_category(CategoryFilter::Only(1)).unwrap();

        state.replace(vec![], vec![]);
        assert_eq!(state.category(), CategoryFilter::All);
    }
}
