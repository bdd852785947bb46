//! HTTP client for the POS backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  get / get_query / post_json                                           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  RequestContext::url(path)  +  Authorization: Bearer <token>           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  reqwest send ──(network error)──► ApiError::Transport                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  handle_response                                                       │
//! │   ├── 2xx ──► serde_json ──(bad body)──► ApiError::Decode              │
//! │   ├── 401 ──► Unauthorized                                             │
//! │   ├── 403 ──► Forbidden(message)                                       │
//! │   ├── 404 ──► NotFound(message)                                        │
//! │   ├── 400 ──► BadRequest(message)                                      │
//! │   └── any ──► Server { status, message }                               │
//! │                                                                         │
//! │  message = body.message ?? body text ?? status reason                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::context::RequestContext;
use crate::dto::ErrorBody;
use crate::error::{ApiError, ApiResult};

/// Header carrying the per-checkout-attempt key on order creation.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP client for the backend REST API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    ctx: RequestContext,
}

impl HttpClient {
    /// Creates a client for `ctx` with a whole-request timeout.
    pub fn new(ctx: RequestContext, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, ctx })
    }

    /// Creates a client from validated configuration.
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        config.validate()?;
        Self::new(config.request_context()?, config.timeout())
    }

    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, self.ctx.bearer())
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(method = "GET", path, "Backend request");
        let request = self.authorized(self.client.get(self.ctx.url(path)));
        let response = request.send().await?;
        Self::handle_response(path, response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        debug!(method = "GET", path, "Backend request");
        let request = self.authorized(self.client.get(self.ctx.url(path)).query(query));
        let response = request.send().await?;
        Self::handle_response(path, response).await
    }

    /// Make a POST request with JSON body and an idempotency key
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Uuid,
    ) -> ApiResult<T> {
        debug!(method = "POST", path, %idempotency_key, "Backend request");
        let request = self
            .authorized(self.client.post(self.ctx.url(path)))
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(body);
        let response = request.send().await?;
        Self::handle_response(path, response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(|e| {
                warn!(path, error = %e, "Unexpected response body");
                ApiError::Decode(e)
            });
        }

        let message = error_message(status, &bytes);
        warn!(path, status = status.as_u16(), message = %message, "Backend rejected request");

        Err(match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Picks the most readable reason out of an error response.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_slice::<ErrorBody>(body)
    {
        if !message.trim().is_empty() {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_message() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            br#"{"message":"Insufficient stock","status":400}"#,
        );
        assert_eq!(msg, "Insufficient stock");
    }

    #[test]
    fn test_error_message_falls_back_to_text_then_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"upstream down"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, br#"{"error":"x"}"#),
            "Not Found"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, b""),
            "Internal Server Error"
        );
    }
}
