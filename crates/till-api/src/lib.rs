//! # till-api: Backend Client for Till
//!
//! Owns every network call of the checkout terminal.
//!
//! ## Modules
//!
//! - [`config`] - Server URL, timeout and token settings
//! - [`context`] - Validated base URL + bearer token handed to the client
//! - [`http`] - reqwest client and status-code mapping
//! - [`dto`] - Request bodies and response envelopes
//! - [`backend`] - The [`PosBackend`] trait and its HTTP implementation
//! - [`error`] - [`ApiError`] with handling categories
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use till_api::{ApiConfig, HttpClient, PosBackend};
//!
//! # async fn run() -> till_api::ApiResult<()> {
//! let mut config = ApiConfig::default();
//! config.apply_env_overrides();
//!
//! let client = HttpClient::from_config(&config)?;
//! let user = client.current_user().await?;
//! let store = client.resolve_store(&user).await?;
//! let products = client.list_products(store.id).await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod http;

pub use backend::PosBackend;
pub use config::{ApiConfig, AuthSettings, ServerSettings};
pub use context::RequestContext;
pub use error::{ApiError, ApiResult};
pub use http::{HttpClient, IDEMPOTENCY_KEY_HEADER};
