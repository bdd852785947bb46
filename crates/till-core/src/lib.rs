//! # till-core: Pure Checkout Logic for Till
//!
//! This crate is the **heart** of Till. It contains the checkout rules as
//! pure functions and plain state, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal (apps/terminal)                     │   │
//! │  │    search ──► add ──► checkout ──► pay ──► confirm ──► receipt  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ catalog  │ │   cart   │ │ checkout │ │ receipt  │          │   │
//! │  │   │  filter  │ │  ledger  │ │  phases  │ │  layout  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TERMINAL OUTPUT                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-api (REST client)                       │   │
//! │  │          profile, store, products, customers, orders            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Receipt, PaymentMethod, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - Product grid filtering
//! - [`cart`] - Cart ledger and totals
//! - [`checkout`] - Checkout phase machine
//! - [`receipt`] - Receipt layout
//! - [`error`] - Domain error types
//! - [`validation`] - Cashier input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::cart::CartLedger;
//! use till_core::money::Money;
//! use till_core::types::Product;
//!
//! let tea: Product = serde_json::from_str(
//!     r#"{ "id": 1, "name": "Tea", "sellingPrice": 10, "discountPercentage": 20 }"#,
//! ).unwrap();
//!
//! let mut cart = CartLedger::new();
//! cart.add_product(&tea);
//! cart.add_product(&tea);
//!
//! assert_eq!(cart.subtotal(), Money::from_cents(2000));
//! assert_eq!(cart.total(), Money::from_cents(1600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLedger, CartLine, CartTotals};
pub use catalog::{filter_products, CategoryFilter};
pub use checkout::{CheckoutFlow, CheckoutPhase, PhaseKind};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{format_receipt, ReceiptView};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shortest customer search that is sent to the backend.
pub const MIN_CUSTOMER_QUERY_LEN: usize = 2;

/// Longest accepted search text.
pub const MAX_SEARCH_LEN: usize = 100;

/// Largest single quantity step (`qty <id> <delta>`).
///
/// ## Business Reason
/// Catches typos such as 1000 for 10 at the till.
pub const MAX_QUANTITY_STEP: i64 = 999;
