//! # Cart Ledger
//!
//! The in-memory line items of the sale being assembled.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  Cashier Action           Ledger Method            Ledger Change        │
//! │  ──────────────           ─────────────            ─────────────        │
//! │                                                                         │
//! │  Click Product ──────────► add_product() ────────► push or qty += 1     │
//! │                                                                         │
//! │  +/- Buttons ────────────► change_quantity() ────► qty += delta         │
//! │                                                    (≤ 0 removes line)  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_product() ─────► retain(!= id)        │
//! │                                                                         │
//! │  Order Placed ───────────► clear() ──────────────► empty, CASH, no cust │
//! │                                                                         │
//! │  Render ─────────────────► subtotal() / total() ─► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id (re-adding increments quantity)
//! - Every line has quantity ≥ 1
//! - Totals are derived on every read, never cached

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Customer, DiscountRate, EntityId, OrderDraft, OrderLine, PaymentMethod, Product};

/// A line in the cart.
///
/// ## Price Freezing
/// Prices are captured when the product is first added. Re-adding the same
/// product, or changing its quantity, does not re-read the product's current
/// price or discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product as it was when first added (frozen).
    pub product: Product,

    pub quantity: i64,

    /// Undiscounted unit price (frozen).
    pub base_price: Money,

    /// Unit price actually charged (frozen).
    pub effective_price: Money,

    /// Discount that produced `effective_price` (frozen).
    pub discount: DiscountRate,
}

impl CartLine {
    /// Creates a line with quantity 1, locking in the product's pricing.
    pub fn from_product(product: &Product) -> Self {
        let base_price = product.base_price();
        let discount = product.discount();
        CartLine {
            product: product.clone(),
            quantity: 1,
            base_price,
            effective_price: discount.apply(base_price),
            discount,
        }
    }

    pub fn product_id(&self) -> EntityId {
        self.product.id
    }

    /// `base_price × quantity`.
    pub fn line_subtotal(&self) -> Money {
        self.base_price.multiply_quantity(self.quantity)
    }

    /// `effective_price × quantity`.
    pub fn line_total(&self) -> Money {
        self.effective_price.multiply_quantity(self.quantity)
    }

    pub fn line_discount(&self) -> Money {
        self.line_subtotal() - self.line_total()
    }

    pub fn is_discounted(&self) -> bool {
        self.effective_price < self.base_price
    }
}

/// The cart of one checkout session, with its customer and payment method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLedger {
    /// Insertion order is display order.
    lines: Vec<CartLine>,
    customer: Option<Customer>,
    payment_method: PaymentMethod,
}

impl CartLedger {
    /// Creates an empty ledger paying by cash.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: EntityId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id() == product_id)
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Adds one unit of `product`.
    ///
    /// - Already in cart: quantity + 1, prices untouched
    /// - Not in cart: new line at the end with quantity 1
    pub fn add_product(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }
        self.lines.push(CartLine::from_product(product));
    }

    /// Adds `delta` to a line's quantity; a result ≤ 0 removes the line.
    ///
    /// Unknown product ids are a no-op.
    pub fn change_quantity(&mut self, product_id: EntityId, delta: i64) {
        let Some(index) = self.lines.iter().position(|l| l.product_id() == product_id) else {
            return;
        };
        let quantity = self.lines[index].quantity.saturating_add(delta);
        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = quantity;
        }
    }

    /// Removes a line. Removing an absent product is a no-op.
    pub fn remove_product(&mut self, product_id: EntityId) {
        self.lines.retain(|l| l.product_id() != product_id);
    }

    /// Empties the cart, deselects the customer and resets payment to cash.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer = None;
        self.payment_method = PaymentMethod::default();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// `Σ base_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_subtotal).sum()
    }

    /// `Σ effective_price × quantity`.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// `subtotal − total`, never negative.
    pub fn total_discount(&self) -> Money {
        self.subtotal() - self.total()
    }

    /// Builds the order for submission. Line prices are effective prices.
    pub fn to_order(&self, store_id: EntityId, cashier_id: EntityId) -> OrderDraft {
        OrderDraft {
            store_id,
            customer_id: self.customer.as_ref().map(|c| c.id),
            cashier_id,
            payment_method: self.payment_method,
            total_amount: self.total(),
            lines: self
                .lines
                .iter()
                .map(|l| OrderLine {
                    product_id: l.product_id(),
                    quantity: l.quantity,
                    price: l.effective_price,
                })
                .collect(),
        }
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub total_discount: Money,
    pub total: Money,
}

impl From<&CartLedger> for CartTotals {
    fn from(cart: &CartLedger) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            total_discount: cart.total_discount(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: EntityId, selling: Option<i64>, mrp: Option<i64>, discount: Option<f64>) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            sku: Some(format!("SKU-{}", id)),
            category: None,
            selling_price: selling.map(Money::from_cents),
            mrp: mrp.map(Money::from_cents),
            discount_percentage: discount,
            brand: None,
        }
    }

    fn assert_invariants(cart: &CartLedger) {
        assert_eq!(cart.total(), cart.subtotal() - cart.total_discount());
        assert!(!cart.total_discount().is_negative());
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn test_scenario_two_products() {
        let mut cart = CartLedger::new();
        let a = test_product(1, Some(1000), None, Some(20.0));
        let b = test_product(2, None, Some(500), Some(0.0));

        cart.add_product(&a);
        cart.add_product(&a);
        cart.add_product(&b);

        assert_eq!(cart.subtotal(), Money::from_cents(2500));
        assert_eq!(cart.total(), Money::from_cents(2100));
        assert_eq!(cart.total_discount(), Money::from_cents(400));
        assert_invariants(&cart);
    }

    #[test]
    fn test_add_same_product_increments_single_line() {
        let mut cart = CartLedger::new();
        let product = test_product(1, Some(999), None, None);

        cart.add_product(&product);
        cart.add_product(&product);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.line(1).map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_readd_keeps_price_locked_at_first_add() {
        let mut cart = CartLedger::new();
        let mut product = test_product(1, Some(1000), None, Some(10.0));
        cart.add_product(&product);

        product.discount_percentage = Some(50.0);
        product.selling_price = Some(Money::from_cents(2000));
        cart.add_product(&product);

        let line = cart.line(1).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.base_price, Money::from_cents(1000));
        assert_eq!(line.effective_price, Money::from_cents(900));
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let mut cart = CartLedger::new();
        for id in [3, 1, 2] {
            cart.add_product(&test_product(id, Some(100), None, None));
        }
        cart.add_product(&test_product(1, Some(100), None, None));
        let order: Vec<_> = cart.lines().iter().map(|l| l.product_id()).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_change_quantity_to_zero_removes_line() {
        let mut cart = CartLedger::new();
        let product = test_product(1, Some(100), None, None);
        cart.add_product(&product);
        cart.add_product(&product);
        cart.add_product(&product);

        cart.change_quantity(1, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_below_zero_removes_line() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(100), None, None));
        cart.change_quantity(1, -5);
        assert!(cart.line(1).is_none());
        assert_invariants(&cart);
    }

    #[test]
    fn test_change_quantity_updates_in_place() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(100), None, None));
        cart.add_product(&test_product(2, Some(100), None, None));
        cart.change_quantity(1, 4);
        assert_eq!(cart.line(1).map(|l| l.quantity), Some(5));
        assert_eq!(cart.lines()[0].product_id(), 1);
    }

    #[test]
    fn test_unknown_product_is_noop() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(100), None, None));
        let before = cart.clone();

        cart.change_quantity(42, 1);
        cart.change_quantity(42, -1);
        cart.remove_product(42);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(100), None, None));
        cart.remove_product(1);
        cart.remove_product(1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_resets_customer_and_payment() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(100), None, None));
        cart.set_customer(Some(Customer {
            id: 5,
            full_name: "Asha".into(),
            email: None,
            phone: None,
        }));
        cart.set_payment_method(PaymentMethod::Card);

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.customer().is_none());
        assert_eq!(cart.payment_method(), PaymentMethod::Cash);
    }

    #[test]
    fn test_invariants_hold_across_mixed_operations() {
        let mut cart = CartLedger::new();
        let products = [
            test_product(1, Some(1999), None, Some(12.5)),
            test_product(2, None, Some(333), Some(33.3)),
            test_product(3, Some(0), Some(750), None),
            test_product(4, None, None, Some(50.0)),
        ];
        for (step, product) in products.iter().cycle().take(12).enumerate() {
            cart.add_product(product);
            if step % 3 == 0 {
                cart.change_quantity(product.id, -1);
            }
            assert_invariants(&cart);
        }
        cart.change_quantity(2, 7);
        assert_invariants(&cart);
    }

    #[test]
    fn test_to_order_uses_effective_prices() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(1000), None, Some(20.0)));
        cart.add_product(&test_product(1, Some(1000), None, Some(20.0)));
        cart.set_payment_method(PaymentMethod::Upi);

        let order = cart.to_order(7, 11);

        assert_eq!(order.store_id, 7);
        assert_eq!(order.cashier_id, 11);
        assert_eq!(order.customer_id, None);
        assert_eq!(order.payment_method, PaymentMethod::Upi);
        assert_eq!(order.total_amount, Money::from_cents(1600));
        assert_eq!(
            order.lines,
            vec![OrderLine {
                product_id: 1,
                quantity: 2,
                price: Money::from_cents(800)
            }]
        );
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = CartLedger::new();
        cart.add_product(&test_product(1, Some(1000), None, Some(20.0)));
        cart.change_quantity(1, 1);
        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.subtotal, Money::from_cents(2000));
        assert_eq!(totals.total_discount, Money::from_cents(400));
        assert_eq!(totals.total, Money::from_cents(1600));
    }
}
