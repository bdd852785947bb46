//! Customer search box with its suggestion list.

use till_core::{Customer, EntityId};

#[derive(Debug, Default)]
pub struct CustomerPicker {
    query: String,
    suggestions: Vec<Customer>,
    open: bool,
}

impl CustomerPicker {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Customer] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Shows a fresh set of suggestions for `query`.
    pub fn show(&mut self, query: impl Into<String>, suggestions: Vec<Customer>) {
        self.query = query.into();
        self.open = !suggestions.is_empty();
        self.suggestions = suggestions;
    }

    /// Records a query too short to search with; the list is emptied.
    pub fn clear_suggestions(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.suggestions.clear();
        self.open = false;
    }

    pub fn find(&self, id: EntityId) -> Option<&Customer> {
        self.suggestions.iter().find(|c| c.id == id)
    }

    /// Fills the search box with the chosen name and closes the list.
    pub fn choose(&mut self, customer: &Customer) {
        self.query = customer.full_name.clone();
        self.open = false;
    }

    pub fn reset(&mut self) {
        *self = CustomerPicker::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: EntityId, name: &str) -> Customer {
        Customer {
            id,
            full_name: name.to_string(),
            email: None,
            phone: Some("98450".to_string()),
        }
    }

    #[test]
    fn test_choose_fills_query_and_closes() {
        let mut picker = CustomerPicker::default();
        picker.show("as", vec![customer(1, "Asha Rao"), customer(2, "Aslam Khan")]);
        assert!(picker.is_open());

        let chosen = picker.find(2).cloned().unwrap();
        picker.choose(&chosen);
        assert_eq!(picker.query(), "Aslam Khan");
        assert!(!picker.is_open());
    }

    #[test]
    fn test_empty_result_keeps_list_closed() {
        let mut picker = CustomerPicker::default();
        picker.show("zz", vec![]);
        assert!(!picker.is_open());

        picker.show("as", vec![customer(1, "Asha Rao")]);
        picker.clear_suggestions("a");
        assert!(picker.suggestions().is_empty());
        assert_eq!(picker.query(), "a");
    }
}
