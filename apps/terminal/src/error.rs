//! # UI Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Terminal                           │
//! │                                                                         │
//! │  > confirm                                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler  ──►  Result<T, UiError>                        │  │
//! │  │         │                                                        │  │
//! │  │  Phase rule broken? ── CoreError::InvalidPhase ──┐               │  │
//! │  │         │                                        │               │  │
//! │  │  Backend said no?  ─── ApiError::BadRequest ─────┴──► UiError ──►│  │
//! │  │         │                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ✗ [REMOTE] Insufficient stock for Tea                                 │
//! │                                                                         │
//! │  The session always survives: an error is printed, never a panic.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use till_api::ApiError;
use till_core::{CoreError, ValidationError};

/// Error shown to the cashier when a command fails.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes, used for styling and exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad input typed by the cashier
    Validation,

    /// Command not available in the current checkout phase
    InvalidState,

    /// Product, customer or category id unknown
    NotFound,

    /// The signed-in user has no store yet
    NoStore,

    /// Token rejected by the backend
    Unauthorized,

    /// Backend or network failure
    Remote,

    /// Settings are wrong; fix and restart
    Config,

    /// Local failure (e.g. writing a receipt file)
    Internal,
}

impl UiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        UiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        UiError::new(ErrorCode::Validation, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        UiError::new(ErrorCode::Internal, message)
    }

    pub fn no_store() -> Self {
        UiError::new(
            ErrorCode::NoStore,
            "No store is set up for this account yet. Ask the store owner to finish onboarding.",
        )
    }

    /// Converts a backend failure using `fallback` when the backend gave no
    /// readable reason.
    pub fn remote(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Unauthorized => UiError::new(
                ErrorCode::Unauthorized,
                "The API token was rejected. Sign in again and restart with a fresh token.",
            ),
            e if e.is_config_error() => UiError::new(ErrorCode::Config, e.to_string()),
            e => UiError::new(ErrorCode::Remote, e.user_message(fallback)),
        }
    }
}

/// Converts core errors to UI errors.
impl From<CoreError> for UiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => UiError::validation("Cart is empty"),
            CoreError::InvalidPhase { .. } => UiError::new(ErrorCode::InvalidState, err.to_string()),
            CoreError::ProductNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::CategoryNotFound(_) => UiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::Validation(e) => UiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for UiError {
    fn from(err: ValidationError) -> Self {
        UiError::validation(err.to_string())
    }
}

/// Converts backend errors to UI errors.
impl From<ApiError> for UiError {
    fn from(err: ApiError) -> Self {
        if !err.is_config_error() && !matches!(err, ApiError::Unauthorized) {
            tracing::error!(error = %err, "Backend call failed");
        }
        UiError::remote(&err, "Request to the server failed")
    }
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for UiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::PhaseKind;

    #[test]
    fn test_core_errors_map_to_codes() {
        assert_eq!(UiError::from(CoreError::EmptyCart).code, ErrorCode::Validation);
        assert_eq!(UiError::from(CoreError::ProductNotFound(3)).code, ErrorCode::NotFound);

        let err = UiError::from(CoreError::InvalidPhase {
            action: "confirm payment",
            phase: PhaseKind::Browsing,
        });
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(err.message, "Cannot confirm payment while browsing");
    }

    #[test]
    fn test_api_errors_keep_backend_reason() {
        let err = UiError::from(ApiError::BadRequest("Insufficient stock".into()));
        assert_eq!(err.code, ErrorCode::Remote);
        assert_eq!(err.message, "Insufficient stock");

        assert_eq!(UiError::from(ApiError::Unauthorized).code, ErrorCode::Unauthorized);
        assert_eq!(UiError::from(ApiError::MissingToken).code, ErrorCode::Config);
    }

    #[test]
    fn test_display() {
        let err = UiError::validation("Cart is empty");
        assert_eq!(err.to_string(), "[Validation] Cart is empty");
    }
}
