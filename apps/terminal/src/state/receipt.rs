//! # Receipt Panel
//!
//! Fetches the receipt of a completed order and keeps the result for
//! display. A failed fetch stays on screen with a retry action.
//!
//! ```text
//! CLOSED ──open(id)──► LOADING ──ok──► LOADED(receipt)
//!                         │
//!                         └──err──► FAILED(message) ──retry──► LOADING
//! ```
//!
//! Receipts are immutable once the order exists, so fetching the same id
//! again yields the same view.

use tracing::{debug, warn};

use till_api::PosBackend;
use till_core::{format_receipt, EntityId, Receipt, ReceiptView};

use crate::error::UiError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReceiptStatus {
    #[default]
    Closed,
    Loading,
    Loaded(Receipt),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ReceiptPanel {
    order_id: Option<EntityId>,
    status: ReceiptStatus,
}

impl ReceiptPanel {
    pub fn order_id(&self) -> Option<EntityId> {
        self.order_id
    }

    pub fn status(&self) -> &ReceiptStatus {
        &self.status
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.status, ReceiptStatus::Failed(_)) && self.order_id.is_some()
    }

    /// The formatted receipt, once loaded.
    pub fn view(&self) -> Option<ReceiptView> {
        match &self.status {
            ReceiptStatus::Loaded(receipt) => Some(format_receipt(receipt)),
            _ => None,
        }
    }

    /// Opens the panel for `order_id` and fetches its receipt.
    pub async fn open<B>(&mut self, backend: &B, order_id: EntityId) -> Result<(), UiError>
    where
        B: PosBackend + ?Sized,
    {
        self.order_id = Some(order_id);
        self.status = ReceiptStatus::Loading;
        debug!(order_id, "Fetching receipt");

        match backend.fetch_receipt(order_id).await {
            Ok(receipt) => {
                self.status = ReceiptStatus::Loaded(receipt);
                Ok(())
            }
            Err(e) => {
                warn!(order_id, error = %e, "Receipt fetch failed");
                let err = UiError::remote(&e, "Failed to load receipt");
                self.status = ReceiptStatus::Failed(err.message.clone());
                Err(err)
            }
        }
    }

    /// Fetches the current order's receipt again.
    pub async fn retry<B>(&mut self, backend: &B) -> Result<(), UiError>
    where
        B: PosBackend + ?Sized,
    {
        match self.order_id {
            Some(order_id) => self.open(backend, order_id).await,
            None => Err(UiError::validation("No receipt to retry")),
        }
    }

    pub fn close(&mut self) {
        *self = ReceiptPanel::default();
    }
}
