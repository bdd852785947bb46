//! # Checkout Phases
//!
//! The checkout state machine as a tagged enum, free of I/O. The terminal's
//! `CheckoutSession` drives it around the order-create call.
//!
//! ## Phase Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  request_checkout   ┌───────────────────────┐           │
//! │   │ BROWSING │ ──(cart non-empty)─► │ AWAITING_PAYMENT_CHOICE│           │
//! │   └──────────┘ ◄──── cancel ─────── └───────────┬───────────┘           │
//! │        ▲                                 ▲      │ begin_submit          │
//! │        │                                 │      ▼                       │
//! │   ┌────┴──────┐       complete      ┌────┴──────────┐                   │
//! │   │ COMPLETED │ ◄────────────────── │  SUBMITTING   │                   │
//! │   └───────────┘                     └────┬──────────┘                   │
//! │   (passes straight                       │ fail                         │
//! │    through to BROWSING)             ┌────▼──────┐                       │
//! │                                     │  FAILED   │ ──► AWAITING_...      │
//! │                                     └───────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `COMPLETED` and `FAILED` are transient: they are recorded in the trail and
//! immediately resolve to `BROWSING` and `AWAITING_PAYMENT_CHOICE`.

use std::fmt;

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::EntityId;

/// Phase of one checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Catalog browsing and cart editing.
    Browsing,
    /// Payment dialog open; method selectable.
    AwaitingPaymentChoice,
    /// Order-create request in flight.
    Submitting { idempotency_key: Uuid },
    /// Order accepted by the backend.
    Completed { order_id: EntityId },
    /// Order rejected or transport failed.
    Failed { reason: String },
}

impl CheckoutPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            CheckoutPhase::Browsing => PhaseKind::Browsing,
            CheckoutPhase::AwaitingPaymentChoice => PhaseKind::AwaitingPaymentChoice,
            CheckoutPhase::Submitting { .. } => PhaseKind::Submitting,
            CheckoutPhase::Completed { .. } => PhaseKind::Completed,
            CheckoutPhase::Failed { .. } => PhaseKind::Failed,
        }
    }
}

/// Fieldless view of [`CheckoutPhase`] for messages and the trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Browsing,
    AwaitingPaymentChoice,
    Submitting,
    Completed,
    Failed,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PhaseKind::Browsing => "browsing",
            PhaseKind::AwaitingPaymentChoice => "choosing payment",
            PhaseKind::Submitting => "submitting",
            PhaseKind::Completed => "completed",
            PhaseKind::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// Drives [`CheckoutPhase`] transitions and remembers what the last
/// checkout attempt went through.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    phase: CheckoutPhase,
    /// Key of the current checkout attempt, reused when retrying after a failure.
    attempt_key: Option<Uuid>,
    trail: Vec<PhaseKind>,
    last_order_id: Option<EntityId>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        CheckoutFlow {
            phase: CheckoutPhase::Browsing,
            attempt_key: None,
            trail: vec![PhaseKind::Browsing],
            last_order_id: None,
        }
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn is_submitting(&self) -> bool {
        self.kind() == PhaseKind::Submitting
    }

    /// Phases visited since the current checkout attempt started.
    pub fn trail(&self) -> &[PhaseKind] {
        &self.trail
    }

    pub fn last_order_id(&self) -> Option<EntityId> {
        self.last_order_id
    }

    /// Opens the payment dialog.
    ///
    /// An empty cart is rejected with no state change.
    pub fn request_checkout(&mut self, cart_is_empty: bool) -> CoreResult<()> {
        match self.kind() {
            PhaseKind::Browsing => {
                if cart_is_empty {
                    return Err(CoreError::EmptyCart);
                }
                self.attempt_key = None;
                self.trail = vec![PhaseKind::Browsing];
                self.enter(CheckoutPhase::AwaitingPaymentChoice);
                Ok(())
            }
            PhaseKind::AwaitingPaymentChoice => Ok(()),
            phase => Err(CoreError::InvalidPhase {
                action: "start checkout",
                phase,
            }),
        }
    }

    /// Closes the payment dialog without touching the cart.
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.kind() {
            PhaseKind::AwaitingPaymentChoice => {
                self.enter(CheckoutPhase::Browsing);
                Ok(())
            }
            PhaseKind::Browsing => Ok(()),
            phase => Err(CoreError::InvalidPhase {
                action: "cancel checkout",
                phase,
            }),
        }
    }

    /// Moves to `SUBMITTING` and returns the idempotency key for the request.
    ///
    /// Only one submission can be in flight: a second call is rejected.
    pub fn begin_submit(&mut self) -> CoreResult<Uuid> {
        match self.kind() {
            PhaseKind::AwaitingPaymentChoice => {
                let key = *self.attempt_key.get_or_insert_with(Uuid::new_v4);
                self.enter(CheckoutPhase::Submitting {
                    idempotency_key: key,
                });
                Ok(key)
            }
            phase => Err(CoreError::InvalidPhase {
                action: "confirm payment",
                phase,
            }),
        }
    }

    /// Records an accepted order and returns to browsing.
    pub fn complete(&mut self, order_id: EntityId) -> CoreResult<()> {
        self.expect_submitting("complete order")?;
        self.enter(CheckoutPhase::Completed { order_id });
        self.last_order_id = Some(order_id);
        self.attempt_key = None;
        self.enter(CheckoutPhase::Browsing);
        Ok(())
    }

    /// Records a failed submission and reopens the payment choice.
    pub fn fail(&mut self, reason: impl Into<String>) -> CoreResult<()> {
        self.expect_submitting("record failure")?;
        self.enter(CheckoutPhase::Failed {
            reason: reason.into(),
        });
        self.enter(CheckoutPhase::AwaitingPaymentChoice);
        Ok(())
    }

    /// Drops any checkout in progress (navigating away).
    pub fn reset(&mut self) {
        *self = CheckoutFlow {
            last_order_id: self.last_order_id,
            ..CheckoutFlow::new()
        };
    }

    fn expect_submitting(&self, action: &'static str) -> CoreResult<()> {
        match self.kind() {
            PhaseKind::Submitting => Ok(()),
            phase => Err(CoreError::InvalidPhase { action, phase }),
        }
    }

    fn enter(&mut self, next: CheckoutPhase) {
        self.trail.push(next.kind());
        self.phase = next;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
