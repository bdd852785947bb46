//! # Validation Module
//!
//! Checks on what the cashier types before it reaches the cart or the backend.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Layer 1: Command parser (terminal)                                    │
//! │  └── Word splitting, argument count                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ids are numeric                                                   │
//! │  ├── Quantity steps are sane                                           │
//! │  └── Customer search is long enough to be worth a request              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Stock, ownership, everything else                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{parse_entity_id, validate_customer_query};
//!
//! assert_eq!(parse_entity_id("product id", " 17 ").unwrap(), 17);
//! assert!(validate_customer_query("a").unwrap().is_none());
//! ```

use crate::error::ValidationError;
use crate::types::EntityId;
use crate::{MAX_QUANTITY_STEP, MAX_SEARCH_LEN, MIN_CUSTOMER_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Normalises the catalog search text.
///
/// Empty is allowed (shows every product). Returns the trimmed text.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::OutOfRange {
            field: "search".to_string(),
            min: 0,
            max: MAX_SEARCH_LEN as i64,
        });
    }

    Ok(query.to_string())
}

/// Decides whether a customer search should be sent.
///
/// ## Rules
/// - Trimmed query shorter than 2 characters: `Ok(None)`, no request is made
///   and the suggestion list is cleared
/// - Otherwise: `Ok(Some(trimmed))`
pub fn validate_customer_query(query: &str) -> ValidationResult<Option<String>> {
    let query = validate_search_query(query)?;
    if query.chars().count() < MIN_CUSTOMER_QUERY_LEN {
        return Ok(None);
    }
    Ok(Some(query))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a backend id typed by the cashier.
pub fn parse_entity_id(field: &str, raw: &str) -> ValidationResult<EntityId> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    match raw.parse::<EntityId>() {
        Ok(id) if id > 0 => Ok(id),
        Ok(_) => Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: EntityId::MAX,
        }),
        Err(_) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' is not a number", raw),
        }),
    }
}

/// Parses a quantity step such as `+3` or `-1`.
///
/// ## Rules
/// - Must be a non-zero integer
/// - Magnitude must not exceed `MAX_QUANTITY_STEP`
pub fn parse_quantity_delta(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix('+').unwrap_or(raw);

    let delta = digits
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{}' is not a whole number", raw),
        })?;

    if delta == 0 || delta.abs() > MAX_QUANTITY_STEP {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: -MAX_QUANTITY_STEP,
            max: MAX_QUANTITY_STEP,
        });
    }

    Ok(delta)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  tea ").unwrap(), "tea");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(MAX_SEARCH_LEN + 1)).is_err());
    }

    #[test]
    fn test_customer_query_length_gate() {
        assert_eq!(validate_customer_query("").unwrap(), None);
        assert_eq!(validate_customer_query(" a ").unwrap(), None);
        assert_eq!(validate_customer_query("as").unwrap().as_deref(), Some("as"));
    }

    #[test]
    fn test_parse_entity_id() {
        assert_eq!(parse_entity_id("product id", "42").unwrap(), 42);
        assert!(matches!(
            parse_entity_id("product id", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_entity_id("product id", "abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_entity_id("product id", "0"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_quantity_delta() {
        assert_eq!(parse_quantity_delta("+3").unwrap(), 3);
        assert_eq!(parse_quantity_delta("-1").unwrap(), -1);
        assert_eq!(parse_quantity_delta("5").unwrap(), 5);
        assert!(parse_quantity_delta("0").is_err());
        assert!(parse_quantity_delta("lots").is_err());
        assert!(parse_quantity_delta(&(MAX_QUANTITY_STEP + 1).to_string()).is_err());
    }
}
