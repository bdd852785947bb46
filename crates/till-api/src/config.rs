//! # API Configuration
//!
//! Where the backend lives and how to authenticate against it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority, applied by the terminal)     │
//! │     --base-url, --token                                                │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TILL_API_BASE_URL=https://pos.example.com                          │
//! │     TILL_API_TOKEN=eyJhbGciOi...                                       │
//! │     TILL_TIMEOUT_SECS=20                                               │
//! │                                                                         │
//! │  3. TOML Config File (terminal.toml)                                   │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     http://localhost:5000, 30s timeout, no token                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! base_url = "https://pos.example.com"
//! timeout_secs = 30
//!
//! [auth]
//! token = "eyJhbGciOi..."
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Backend root, e.g. `https://pos.example.com`. Must be http(s).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Auth Settings
// =============================================================================

/// Sign-in happens outside the terminal; it is only handed the token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub token: Option<String>,
}

// =============================================================================
// Main API Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub auth: AuthSettings,
}

impl ApiConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = self.server.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::InvalidConfig(format!(
                "Base URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.server.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.token().is_none() {
            return Err(ApiError::MissingToken);
        }

        Ok(())
    }

    /// Applies `TILL_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides read through `lookup` (the environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("TILL_API_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.server.base_url = url;
        }

        if let Some(token) = lookup("TILL_API_TOKEN") {
            debug!("Overriding API token from environment");
            self.auth.token = Some(token);
        }

        if let Some(timeout) = lookup("TILL_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.server.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric TILL_TIMEOUT_SECS"),
            }
        }
    }

    /// Returns the token, treating a blank one as absent.
    pub fn token(&self) -> Option<&str> {
        self.auth
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }

    /// Builds the capability every request is made with.
    pub fn request_context(&self) -> ApiResult<RequestContext> {
        let token = self.token().ok_or(ApiError::MissingToken)?;
        RequestContext::new(&self.server.base_url, token)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
