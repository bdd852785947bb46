//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Checkout rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-api errors (separate crate)                                      │
//! │  └── ApiError         - Remote call failures                           │
//! │                                                                         │
//! │  Terminal errors (in app)                                              │
//! │  └── UiError          - What the cashier sees                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ──┐                                 │
//! │                          ApiError  ──┴──► UiError → notice on screen   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart operations themselves never fail: unknown product ids are no-ops.
//! Errors here come from phase rules and user input.

use thiserror::Error;

use crate::checkout::PhaseKind;
use crate::types::EntityId;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was requested with nothing in the cart.
    ///
    /// Rejected locally: no order request is ever built.
    #[error("Cart is empty")]
    EmptyCart,

    /// The requested action is not available in the current checkout phase.
    ///
    /// ## When This Occurs
    /// - `confirm` while still browsing (payment dialog not open)
    /// - a second `confirm` while an order is already being submitted
    /// - `checkout` while the payment dialog is already open
    #[error("Cannot {action} while {phase}")]
    InvalidPhase { action: &'static str, phase: PhaseKind },

    /// Product id is not part of the loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(EntityId),

    /// Customer id is not among the current suggestions.
    #[error("Customer not found: {0}")]
    CustomerNotFound(EntityId),

    /// Category id is not one of the store's categories.
    #[error("Category not found: {0}")]
    CategoryNotFound(EntityId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a non-numeric id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");

        let err = CoreError::InvalidPhase {
            action: "confirm payment",
            phase: PhaseKind::Browsing,
        };
        assert_eq!(err.to_string(), "Cannot confirm payment while browsing");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "quantity step".to_string(),
            min: -999,
            max: 999,
        };
        assert_eq!(err.to_string(), "quantity step must be between -999 and 999");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
