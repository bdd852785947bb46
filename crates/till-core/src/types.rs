//! # Domain Types
//!
//! Types shared by the checkout core, read straight off the backend's JSON.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │     Store       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  sku            │   │  full_name      │   │  brand          │       │
//! │  │  selling_price  │   │  email / phone  │   └─────────────────┘       │
//! │  │  mrp            │   └─────────────────┘                              │
//! │  │  discount %     │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountRate   │   │ PaymentMethod   │   │    Receipt      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  CASH           │   │  immutable,     │       │
//! │  │  2000 = 20%     │   │  UPI            │   │  backend-made   │       │
//! │  └─────────────────┘   │  CARD           │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money fields arrive as decimal numbers and are converted to [`Money`] by
//! [`crate::money::decimal`]. Identifiers are the backend's numeric ids.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{decimal, Money};

/// Backend identifier (stores, products, categories, customers, users, orders).
pub type EntityId = i64;

// =============================================================================
// Discount Rate
// =============================================================================

/// Per-product discount represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 2000 bps = 20%. Always within 0..=10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Full price, no discount.
    pub const NONE: DiscountRate = DiscountRate(0);

    /// Creates a rate from basis points, clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > 10_000 {
            DiscountRate(10_000)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a rate from a percentage, clamped to `0..=100`.
    ///
    /// Non-finite or negative input means no discount.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return DiscountRate::NONE;
        }
        DiscountRate::from_bps((pct.min(100.0) * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Price per unit after the discount: `price × (1 − pct/100)`.
    #[inline]
    pub fn apply(&self, price: Money) -> Money {
        price.apply_percentage_discount(self.0)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Category reference embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: EntityId,
    #[serde(default)]
    pub name: Option<String>,
}

/// A product category of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub store_id: Option<EntityId>,
}

/// A product available for sale (read-only to the checkout core).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: EntityId,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Stock Keeping Unit. Optional on the backend.
    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub category: Option<CategoryRef>,

    #[serde(default, with = "decimal::option")]
    pub selling_price: Option<Money>,

    /// Maximum retail price, used when no selling price is set.
    #[serde(default, with = "decimal::option")]
    pub mrp: Option<Money>,

    /// Discount percentage (0-100).
    #[serde(default)]
    pub discount_percentage: Option<f64>,

    #[serde(default)]
    pub brand: Option<String>,
}

impl Product {
    /// Undiscounted unit price: `sellingPrice`, falling back to `mrp`, else 0.
    ///
    /// A zero selling price falls through to `mrp` as well.
    pub fn base_price(&self) -> Money {
        self.selling_price
            .filter(|p| !p.is_zero())
            .or(self.mrp)
            .unwrap_or_default()
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount_percentage
            .map(DiscountRate::from_percentage)
            .unwrap_or_default()
    }

    /// Unit price actually charged.
    pub fn effective_price(&self) -> Money {
        self.discount().apply(self.base_price())
    }

    pub fn category_id(&self) -> Option<EntityId> {
        self.category.as_ref().map(|c| c.id)
    }
}

// =============================================================================
// People and Places
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: EntityId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Customer {
    /// Suggestion label: `name - email`, falling back to phone.
    pub fn label(&self) -> String {
        match self.email.as_deref().or(self.phone.as_deref()) {
            Some(contact) if !contact.is_empty() => format!("{} - {}", self.full_name, contact),
            _ => self.full_name.clone(),
        }
    }
}

/// The store a cashier sells for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: EntityId,
    /// Trading name shown on the screen.
    #[serde(default)]
    pub brand: Option<String>,
}

/// Role of the signed-in user. Owners resolve their store differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ROLE_OWNER")]
    Owner,
    #[serde(rename = "ROLE_CASHIER")]
    Cashier,
    #[serde(rename = "ROLE_STORE_MANAGER")]
    StoreManager,
    #[serde(other)]
    Other,
}

/// The signed-in user; acts as cashier on submitted orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: UserRole,
}

impl User {
    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. Sent to the backend as `CASH`, `UPI` or `CARD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Upi,
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Upi, PaymentMethod::Card];

    /// Wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "CARD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "UPI" => Ok(PaymentMethod::Upi),
            "CARD" => Ok(PaymentMethod::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// One line of an order being submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: EntityId,
    pub quantity: i64,
    /// Effective (discounted) unit price at time of sale.
    pub price: Money,
}

/// Everything the backend needs to create an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub store_id: EntityId,
    pub customer_id: Option<EntityId>,
    pub cashier_id: EntityId,
    pub payment_method: PaymentMethod,
    pub total_amount: Money,
    pub lines: Vec<OrderLine>,
}

// =============================================================================
// Receipt
// =============================================================================

/// One receipt line as produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub product_name: String,
    #[serde(default)]
    pub product_sku: Option<String>,
    pub quantity: i64,
    #[serde(default, with = "decimal")]
    pub original_price: Money,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default, with = "decimal")]
    pub discount_amount: Money,
    #[serde(default, with = "decimal")]
    pub final_price: Money,
    #[serde(default, with = "decimal")]
    pub line_total: Money,
}

/// Immutable record of a completed order, fetched for display/printing.
///
/// Totals are accepted as given by the backend and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub order_id: EntityId,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub order_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub store_address: Option<String>,
    #[serde(default)]
    pub store_phone: Option<String>,

    #[serde(default)]
    pub cashier_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,

    #[serde(default)]
    pub items: Vec<ReceiptItem>,

    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default, with = "decimal::option")]
    pub subtotal: Option<Money>,
    #[serde(default, with = "decimal::option")]
    pub total_discount: Option<Money>,
    #[serde(default, with = "decimal::option")]
    pub total_amount: Option<Money>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        assert_eq!(DiscountRate::from_percentage(20.0).bps(), 2000);
        assert_eq!(DiscountRate::from_percentage(12.5).bps(), 1250);
        assert_eq!(DiscountRate::from_percentage(150.0).bps(), 10_000);
        assert_eq!(DiscountRate::from_percentage(-3.0), DiscountRate::NONE);
        assert_eq!(DiscountRate::from_percentage(f64::NAN), DiscountRate::NONE);
    }

    #[test]
    fn test_base_price_fallbacks() {
        let p = product(r#"{ "id": 1, "name": "Tea", "sellingPrice": 10, "mrp": 12 }"#);
        assert_eq!(p.base_price(), Money::from_cents(1000));

        let p = product(r#"{ "id": 1, "name": "Tea", "mrp": 5 }"#);
        assert_eq!(p.base_price(), Money::from_cents(500));

        let p = product(r#"{ "id": 1, "name": "Tea", "sellingPrice": 0, "mrp": 5 }"#);
        assert_eq!(p.base_price(), Money::from_cents(500));

        let p = product(r#"{ "id": 1, "name": "Tea" }"#);
        assert_eq!(p.base_price(), Money::zero());
    }

    #[test]
    fn test_effective_price_never_exceeds_base() {
        for pct in [0.0, 5.0, 12.5, 33.3, 99.9, 100.0] {
            let p = Product {
                id: 1,
                name: "Tea".into(),
                sku: None,
                category: None,
                selling_price: Some(Money::from_cents(1999)),
                mrp: None,
                discount_percentage: Some(pct),
                brand: None,
            };
            assert!(p.effective_price() <= p.base_price(), "pct {pct}");
        }
    }

    #[test]
    fn test_effective_price_scenario() {
        let p = product(
            r#"{ "id": 7, "name": "A", "sku": "A-1", "sellingPrice": 10, "discountPercentage": 20,
                 "category": { "id": 3, "name": "Drinks" } }"#,
        );
        assert_eq!(p.effective_price(), Money::from_cents(800));
        assert_eq!(p.category_id(), Some(3));
    }

    #[test]
    fn test_payment_method_wire_and_parse() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), r#""UPI""#);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(" Cash ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_user_role_unknown_is_other() {
        let user: User =
            serde_json::from_str(r#"{ "id": 4, "role": "ROLE_ADMIN" }"#).unwrap();
        assert_eq!(user.role, UserRole::Other);
        assert!(!user.is_owner());
    }

    #[test]
    fn test_customer_label() {
        let mut c = Customer {
            id: 1,
            full_name: "Asha Rao".into(),
            email: Some("asha@example.com".into()),
            phone: Some("555-0100".into()),
        };
        assert_eq!(c.label(), "Asha Rao - asha@example.com");
        c.email = None;
        assert_eq!(c.label(), "Asha Rao - 555-0100");
        c.phone = None;
        assert_eq!(c.label(), "Asha Rao");
    }

    #[test]
    fn test_receipt_deserializes_backend_shape() {
        let receipt: Receipt = serde_json::from_str(
            r#"{
                "orderId": 42,
                "receiptNumber": "RCP-42",
                "orderDate": "2024-03-05T14:07:31.123456",
                "storeName": "Corner Shop",
                "items": [{
                    "productName": "A", "productSku": "A-1", "quantity": 2,
                    "originalPrice": 10.0, "discountPercentage": 20.0, "discountAmount": 2.0,
                    "finalPrice": 8.0, "lineTotal": 16.0
                }],
                "paymentType": "UPI",
                "subtotal": 20.0, "totalDiscount": 4.0, "totalAmount": 16.0
            }"#,
        )
        .unwrap();
        assert_eq!(receipt.order_id, 42);
        assert_eq!(receipt.items[0].line_total, Money::from_cents(1600));
        assert_eq!(receipt.total_amount, Some(Money::from_cents(1600)));
        assert!(receipt.order_date.is_some());
    }
}
