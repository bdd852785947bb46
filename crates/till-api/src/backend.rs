//! # Backend Seam
//!
//! [`PosBackend`] lists every remote call the checkout terminal makes. The
//! terminal's session is generic over it, so tests drive the session with
//! an in-memory fake and production uses [`HttpClient`].
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────┬────────┬─────────────────────────────────────────┐
//! │ Call                 │ Method │ Path                                    │
//! ├──────────────────────┼────────┼─────────────────────────────────────────┤
//! │ current_user         │ GET    │ /api/user/profile                       │
//! │ resolve_store        │ GET    │ /api/store/admin      (owner)           │
//! │                      │        │ /api/store/employee   (everyone else)   │
//! │ list_products        │ GET    │ /api/products/store/{storeId}           │
//! │ list_categories      │ GET    │ /api/categories/store/{storeId}         │
//! │ search_customers     │ GET    │ /api/customers/search?q={query}         │
//! │ create_order         │ POST   │ /api/orders         + Idempotency-Key   │
//! │ fetch_receipt        │ GET    │ /api/orders/{orderId}/receipt           │
//! └──────────────────────┴────────┴─────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use till_core::{Category, Customer, EntityId, OrderDraft, Product, Receipt, Store, User};

use crate::dto::{OrderCreated, OrderRequest};
use crate::error::ApiResult;
use crate::http::HttpClient;

/// Remote operations of one checkout terminal.
#[async_trait]
pub trait PosBackend: Send + Sync {
    /// The signed-in user, who acts as cashier.
    async fn current_user(&self) -> ApiResult<User>;

    /// The store the user sells for. A 400/404 means the user has none yet.
    async fn resolve_store(&self, user: &User) -> ApiResult<Store>;

    async fn list_products(&self, store_id: EntityId) -> ApiResult<Vec<Product>>;

    async fn list_categories(&self, store_id: EntityId) -> ApiResult<Vec<Category>>;

    /// Name/phone search. Callers only send queries of two or more characters.
    async fn search_customers(&self, query: &str) -> ApiResult<Vec<Customer>>;

    /// Creates the order and returns its id.
    async fn create_order(&self, order: &OrderDraft, idempotency_key: Uuid) -> ApiResult<EntityId>;

    async fn fetch_receipt(&self, order_id: EntityId) -> ApiResult<Receipt>;
}

#[async_trait]
impl PosBackend for HttpClient {
    async fn current_user(&self) -> ApiResult<User> {
        self.get("/api/user/profile").await
    }

    async fn resolve_store(&self, user: &User) -> ApiResult<Store> {
        let path = if user.is_owner() {
            "/api/store/admin"
        } else {
            "/api/store/employee"
        };
        self.get(path).await
    }

    async fn list_products(&self, store_id: EntityId) -> ApiResult<Vec<Product>> {
        self.get(&format!("/api/products/store/{}", store_id)).await
    }

    async fn list_categories(&self, store_id: EntityId) -> ApiResult<Vec<Category>> {
        self.get(&format!("/api/categories/store/{}", store_id)).await
    }

    async fn search_customers(&self, query: &str) -> ApiResult<Vec<Customer>> {
        self.get_query("/api/customers/search", &[("q", query)]).await
    }

    async fn create_order(&self, order: &OrderDraft, idempotency_key: Uuid) -> ApiResult<EntityId> {
        let body = OrderRequest::from(order);
        let created: OrderCreated = self.post_json("/api/orders", &body, idempotency_key).await?;
        info!(
            order_id = created.id,
            store_id = order.store_id,
            lines = order.lines.len(),
            total = %order.total_amount,
            "Order created"
        );
        Ok(created.id)
    }

    async fn fetch_receipt(&self, order_id: EntityId) -> ApiResult<Receipt> {
        self.get(&format!("/api/orders/{}/receipt", order_id)).await
    }
}
