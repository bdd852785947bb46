//! # State Module
//!
//! Everything the checkout terminal remembers between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  TerminalConfig      read-only after startup (server, auth, receipt)    │
//! │                                                                         │
//! │  CheckoutSession<B>  owned by the REPL task, mutated by one command     │
//! │    ├── CatalogState     products, categories, search, screen state     │
//! │    ├── CartLedger       lines, customer, payment method (till-core)    │
//! │    ├── CheckoutFlow     phase machine (till-core)                      │
//! │    ├── CustomerPicker   search text and suggestions                    │
//! │    ├── ReceiptPanel     receipt of the last order, retryable           │
//! │    └── Notices          messages printed after each command            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod config;
mod customer;
mod notice;
mod receipt;
mod session;

pub use catalog::{CatalogState, ScreenState};
pub use config::{ConfigOverrides, ReceiptSettings, TerminalConfig, PAPER_WIDTH_RANGE};
pub use customer::CustomerPicker;
pub use notice::{Notice, NoticeLevel, Notices};
pub use receipt::{ReceiptPanel, ReceiptStatus};
pub use session::CheckoutSession;
