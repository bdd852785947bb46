//! # Checkout Session
//!
//! One cashier's checkout screen: catalog, cart, customer, payment and the
//! receipt of the last order, driven by the checkout state machine.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CheckoutSession<B: PosBackend>                     │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌────────────────┐  │
//! │  │ CatalogState │ │  CartLedger  │ │ CheckoutFlow │ │ CustomerPicker │  │
//! │  │ products     │ │  lines       │ │ phase        │ │ query          │  │
//! │  │ categories   │ │  customer    │ │ attempt key  │ │ suggestions    │  │
//! │  │ query/filter │ │  payment     │ │ trail        │ │                │  │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └────────────────┘  │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐                                      │
//! │  │ ReceiptPanel │ │   Notices    │        backend: B  (network calls)   │
//! │  └──────────────┘ └──────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is owned by a single task and mutated through `&mut self`,
//! so no locking is needed. Every backend failure is turned into a
//! [`UiError`] or a notice; none ends the session.
//!
//! ## Order Submission
//! ```text
//! confirm_payment()
//!     │
//!     ├── flow.begin_submit() ──────────► SUBMITTING (key reused on retry)
//!     │
//!     ├── backend.create_order(order, key)
//!     │        │
//!     │        ├── Ok(id)  ─► COMPLETED ─► BROWSING
//!     │        │              clear cart + customer, payment = CASH
//!     │        │              open receipt(id), reload catalog
//!     │        │
//!     │        └── Err(e)  ─► FAILED ─► AWAITING_PAYMENT_CHOICE
//!     │                       cart untouched, error reported
//!     ▼
//! ```

use tracing::{debug, error, info, warn};

use till_api::{ApiError, PosBackend};
use till_core::validation::validate_customer_query;
use till_core::{
    CartLedger, CartTotals, Category, CategoryFilter, CheckoutFlow, CoreError, EntityId,
    PaymentMethod, PhaseKind, Product, Store, User,
};

use crate::error::{ErrorCode, UiError};
use crate::state::catalog::{CatalogState, ScreenState};
use crate::state::customer::CustomerPicker;
use crate::state::notice::Notices;
use crate::state::receipt::ReceiptPanel;

pub struct CheckoutSession<B: PosBackend> {
    backend: B,
    user: Option<User>,
    catalog: CatalogState,
    cart: CartLedger,
    flow: CheckoutFlow,
    customers: CustomerPicker,
    receipt: ReceiptPanel,
    notices: Notices,
}

impl<B: PosBackend> CheckoutSession<B> {
    pub fn new(backend: B) -> Self {
        CheckoutSession {
            backend,
            user: None,
            catalog: CatalogState::default(),
            cart: CartLedger::new(),
            flow: CheckoutFlow::new(),
            customers: CustomerPicker::default(),
            receipt: ReceiptPanel::default(),
            notices: Notices::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&self.cart)
    }

    pub fn flow(&self) -> &CheckoutFlow {
        &self.flow
    }

    pub fn phase(&self) -> PhaseKind {
        self.flow.kind()
    }

    pub fn customers(&self) -> &CustomerPicker {
        &self.customers
    }

    pub fn receipt(&self) -> &ReceiptPanel {
        &self.receipt
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads profile, store, products and categories.
    ///
    /// ## Outcomes
    /// - Store lookup answers 400/404: `NoStore` screen, `Ok(())`
    /// - Profile, store or products fail otherwise: `Error` screen, `Err`
    /// - Categories fail: empty category list, `Ready` screen
    pub async fn load(&mut self) -> Result<(), UiError> {
        self.catalog.set_screen(ScreenState::Loading);

        let user = match self.backend.current_user().await {
            Ok(user) => user,
            Err(e) => return Err(self.fail_screen(e, "Failed to load your profile")),
        };
        info!(user_id = user.id, role = ?user.role, "Signed in");
        self.user = Some(user.clone());

        let store = match self.backend.resolve_store(&user).await {
            Ok(store) => store,
            Err(e) if e.is_store_missing() => {
                info!(user_id = user.id, "No store provisioned for user");
                self.catalog.set_store(None);
                self.catalog.replace(Vec::new(), Vec::new());
                self.catalog.set_screen(ScreenState::NoStore);
                return Ok(());
            }
            Err(e) => return Err(self.fail_screen(e, "Failed to load your store")),
        };
        let store_id = store.id;
        self.catalog.set_store(Some(store));

        match self.fetch_catalog(store_id).await {
            Ok((products, categories)) => {
                info!(
                    store_id,
                    products = products.len(),
                    categories = categories.len(),
                    "Catalog loaded"
                );
                self.catalog.replace(products, categories);
                self.catalog.set_screen(ScreenState::Ready);
                Ok(())
            }
            Err(e) => Err(self.fail_screen(e, "Failed to load products")),
        }
    }

    /// Fetches the store's lists again and replaces them wholesale.
    ///
    /// On failure the current lists stay as they are.
    pub async fn reload_catalog(&mut self) -> Result<(), UiError> {
        let store_id = self.store()?.id;
        let (products, categories) = self
            .fetch_catalog(store_id)
            .await
            .map_err(|e| UiError::remote(&e, "Failed to refresh products"))?;
        debug!(store_id, products = products.len(), "Catalog refreshed");
        self.catalog.replace(products, categories);
        self.catalog.set_screen(ScreenState::Ready);
        Ok(())
    }

    /// Products and categories, fetched together. A categories failure
    /// degrades to an empty list.
    async fn fetch_catalog(&self, store_id: EntityId) -> Result<(Vec<Product>, Vec<Category>), ApiError> {
        let (products, categories) = tokio::join!(
            self.backend.list_products(store_id),
            self.backend.list_categories(store_id),
        );

        let categories = categories.unwrap_or_else(|e| {
            warn!(store_id, error = %e, "Categories unavailable, showing none");
            Vec::new()
        });

        Ok((products?, categories))
    }

    fn fail_screen(&mut self, err: ApiError, fallback: &str) -> UiError {
        error!(error = %err, "{}", fallback);
        let ui = UiError::remote(&err, fallback);
        self.catalog.set_screen(ScreenState::Error(ui.message.clone()));
        ui
    }

    fn store(&self) -> Result<&Store, UiError> {
        match self.catalog.screen() {
            ScreenState::NoStore => Err(UiError::no_store()),
            _ => self
                .catalog
                .store()
                .ok_or_else(|| UiError::new(ErrorCode::InvalidState, "Store is not loaded yet")),
        }
    }

    /// Fails unless the catalog is loaded for a store.
    pub fn require_ready(&self) -> Result<(), UiError> {
        match self.catalog.screen() {
            ScreenState::Ready => Ok(()),
            ScreenState::NoStore => Err(UiError::no_store()),
            ScreenState::Loading => Err(UiError::new(
                ErrorCode::InvalidState,
                "Catalog is still loading",
            )),
            ScreenState::Error(message) => Err(UiError::new(
                ErrorCode::InvalidState,
                format!("Catalog failed to load: {}. Use `reload`.", message),
            )),
        }
    }

    fn require_not_submitting(&self, action: &'static str) -> Result<(), UiError> {
        if self.flow.is_submitting() {
            return Err(CoreError::InvalidPhase {
                action,
                phase: PhaseKind::Submitting,
            }
            .into());
        }
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn set_query(&mut self, query: &str) -> Result<(), UiError> {
        let query = till_core::validation::validate_search_query(query)?;
        self.catalog.set_query(query);
        Ok(())
    }

    pub fn set_category(&mut self, filter: CategoryFilter) -> Result<(), UiError> {
        self.catalog.set_category(filter)?;
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds one unit of a catalog product to the cart.
    pub fn add_product(&mut self, product_id: EntityId) -> Result<(), UiError> {
        self.require_ready()?;
        self.require_not_submitting("change the cart")?;

        let product = self
            .catalog
            .product(product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        self.cart.add_product(product);
        debug!(product_id, "Added to cart");
        Ok(())
    }

    /// Changes a line's quantity; a result of zero or less removes it.
    ///
    /// Returns `false` when the product was not in the cart.
    pub fn change_quantity(&mut self, product_id: EntityId, delta: i64) -> Result<bool, UiError> {
        self.require_not_submitting("change the cart")?;

        let present = self.cart.line(product_id).is_some();
        self.cart.change_quantity(product_id, delta);
        debug!(product_id, delta, present, "Quantity changed");
        Ok(present)
    }

    /// Returns `false` when the product was not in the cart.
    pub fn remove_product(&mut self, product_id: EntityId) -> Result<bool, UiError> {
        self.require_not_submitting("change the cart")?;

        let present = self.cart.line(product_id).is_some();
        self.cart.remove_product(product_id);
        Ok(present)
    }

    /// Empties the cart and deselects the customer.
    pub fn clear_cart(&mut self) -> Result<(), UiError> {
        self.require_not_submitting("clear the cart")?;
        self.cart.clear();
        self.customers.reset();
        Ok(())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Searches customers by name or phone.
    ///
    /// Queries shorter than two characters clear the suggestions without a
    /// backend call.
    pub async fn search_customers(&mut self, query: &str) -> Result<usize, UiError> {
        let Some(query) = validate_customer_query(query)? else {
            self.customers.clear_suggestions(query.trim());
            return Ok(0);
        };

        match self.backend.search_customers(&query).await {
            Ok(found) => {
                debug!(query = %query, found = found.len(), "Customer search");
                let count = found.len();
                self.customers.show(query, found);
                Ok(count)
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Customer search failed");
                self.customers.clear_suggestions(query);
                Err(UiError::remote(&e, "Failed to search customers"))
            }
        }
    }

    /// Selects a customer from the current suggestions.
    pub fn select_customer(&mut self, customer_id: EntityId) -> Result<(), UiError> {
        let customer = self
            .customers
            .find(customer_id)
            .cloned()
            .ok_or(CoreError::CustomerNotFound(customer_id))?;
        self.customers.choose(&customer);
        info!(customer_id, "Customer selected");
        self.cart.set_customer(Some(customer));
        Ok(())
    }

    pub fn clear_customer(&mut self) {
        self.cart.set_customer(None);
        self.customers.reset();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Opens the payment choice. An empty cart is rejected and nothing changes.
    pub fn request_checkout(&mut self) -> Result<(), UiError> {
        self.store()?;
        self.flow.request_checkout(self.cart.is_empty())?;
        debug!(total = %self.cart.total(), "Awaiting payment choice");
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<(), UiError> {
        match self.flow.kind() {
            PhaseKind::AwaitingPaymentChoice => {
                self.cart.set_payment_method(method);
                Ok(())
            }
            phase => Err(CoreError::InvalidPhase {
                action: "choose a payment method",
                phase,
            }
            .into()),
        }
    }

    /// Closes the payment choice; the cart is kept.
    pub fn cancel_checkout(&mut self) -> Result<(), UiError> {
        self.flow.cancel()?;
        Ok(())
    }

    /// Submits the cart as an order.
    ///
    /// On success the cart, customer and payment method are reset, the
    /// receipt is opened and the catalog refreshed; returns the order id.
    /// On failure the cart is kept and the payment choice reopens.
    pub async fn confirm_payment(&mut self) -> Result<EntityId, UiError> {
        let store_id = self.store()?.id;
        let cashier_id = self
            .user
            .as_ref()
            .map(|u| u.id)
            .ok_or_else(|| UiError::new(ErrorCode::InvalidState, "Profile is not loaded yet"))?;

        if self.flow.kind() == PhaseKind::AwaitingPaymentChoice && self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let key = self.flow.begin_submit()?;
        let order = self.cart.to_order(store_id, cashier_id);
        info!(
            store_id,
            lines = order.lines.len(),
            total = %order.total_amount,
            payment = %order.payment_method,
            idempotency_key = %key,
            "Submitting order"
        );

        match self.backend.create_order(&order, key).await {
            Ok(order_id) => {
                self.flow.complete(order_id)?;
                info!(order_id, "Order created");

                self.cart.clear();
                self.customers.reset();
                self.notices.success(format!("Order #{} created", order_id));

                if let Err(e) = self.receipt.open(&self.backend, order_id).await {
                    self.notices.error(format!("{} (use `retry`)", e.message));
                }
                if let Err(e) = self.reload_catalog().await {
                    self.notices.error(e.message);
                }
                Ok(order_id)
            }
            Err(e) => {
                error!(error = %e, idempotency_key = %key, "Order submission failed");
                let err = UiError::remote(&e, "Failed to create order");
                self.flow.fail(err.message.clone())?;
                if e.is_retryable() {
                    self.notices.info("Use `confirm` to retry; the order is not placed twice");
                }
                Err(err)
            }
        }
    }

    // =========================================================================
    // Receipt
    // =========================================================================

    pub async fn show_receipt(&mut self, order_id: EntityId) -> Result<(), UiError> {
        self.receipt.open(&self.backend, order_id).await
    }

    pub async fn retry_receipt(&mut self) -> Result<(), UiError> {
        if !self.receipt.can_retry() {
            return Err(UiError::validation("No failed receipt to retry"));
        }
        self.receipt.retry(&self.backend).await
    }

    // =========================================================================
    // Leaving
    // =========================================================================

    /// Drops the checkout in progress when the cashier leaves the screen:
    /// cart, customer, payment choice and any open receipt.
    pub fn abandon(&mut self) {
        if !self.cart.is_empty() {
            self.notices.info(format!(
                "Discarded an unsold cart of {} item(s)",
                self.cart.item_count()
            ));
        }
        info!(phase = %self.flow.kind(), lines = self.cart.item_count(), "Checkout abandoned");

        self.flow.reset();
        self.cart.clear();
        self.customers.reset();
        self.receipt.close();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
