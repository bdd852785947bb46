//! # API Error Types
//!
//! Error type for every call the terminal makes to the backend.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend said no     │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Unauthorized           │ │
//! │  │  MissingToken   │  │  Decode         │  │  Forbidden / NotFound   │ │
//! │  │  ConfigLoad     │  │                 │  │  BadRequest / Server    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Store lookup 400/404 ──► is_store_missing() ──► onboarding screen     │
//! │  Anything else        ──► notice to the cashier, session carries on    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a backend call, or of the settings needed to make one.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid API configuration: {0}")]
    InvalidConfig(String),

    /// No bearer token was supplied.
    #[error("API token not configured. Set TILL_API_TOKEN or pass --token.")]
    MissingToken,

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection, timeout or TLS failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// 401: the token was rejected.
    #[error("Authentication rejected by backend")]
    Unauthorized,

    /// 403.
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400: the backend rejected the request, usually with a readable reason.
    #[error("{0}")]
    BadRequest(String),

    /// Any other non-2xx status.
    #[error("Backend error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// True when a store lookup found no store for the user (400 or 404).
    ///
    /// Callers treat this as the onboarding state, not as a failure.
    pub fn is_store_missing(&self) -> bool {
        matches!(self, ApiError::BadRequest(_) | ApiError::NotFound(_))
    }

    /// True when repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            ApiError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True for errors that no request can fix: the settings are wrong.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidConfig(_) | ApiError::MissingToken | ApiError::ConfigLoad(_)
        )
    }

    /// Message suitable for showing to the cashier.
    ///
    /// Backend-provided reasons are shown as-is; transport noise is replaced
    /// by `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Forbidden(msg) | ApiError::NotFound(msg)
                if !msg.is_empty() =>
            {
                msg.clone()
            }
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Unauthorized => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ConfigLoad(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
