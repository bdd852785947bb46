//! Request context: the base URL and bearer token every call is made with.
//!
//! The terminal receives one of these at startup instead of reading a
//! global auth store. Building it validates the URL, so a client holding a
//! context can always form request URLs.

use std::fmt;

use crate::error::{ApiError, ApiResult};

#[derive(Clone, PartialEq, Eq)]
pub struct RequestContext {
    base_url: String,
    token: String,
}

impl RequestContext {
    pub fn new(base_url: &str, token: &str) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidConfig(format!(
                "Base URL must start with http:// or https://, got: {}",
                base_url
            )));
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::MissingToken);
        }
        Ok(RequestContext {
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/orders`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// Keeps the token out of logs.
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .finish()
    }
}
