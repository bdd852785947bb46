//! # Commands Module
//!
//! The commands a cashier types at the `till>` prompt.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (command grammar, line parsing)
//! ├── dispatch.rs  ◄─── Runs a command against the CheckoutSession
//! └── render.rs    ◄─── Tables and receipt text
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  till[browsing]> qty 7 -2                                               │
//! │         │                                                               │
//! │         │ parse_line (clap, no binary name)                             │
//! │         ▼                                                               │
//! │  Command::Qty { product: 7, delta: -2 }                                 │
//! │         │                                                               │
//! │         │ execute(session, settings, command)                           │
//! │         ▼                                                               │
//! │  Result<Outcome, UiError>  ──► printed, then queued notices             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad input is a clap error and is printed like any other message; the
//! session is never touched by a line that does not parse.

pub(crate) mod dispatch;
pub mod render;

pub use dispatch::{execute, Outcome};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use till_core::validation::{parse_entity_id, parse_quantity_delta};
use till_core::{CategoryFilter, EntityId, PaymentMethod, ValidationError};

/// One line typed at the prompt.
#[derive(Debug, Parser)]
#[command(
    name = "till",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{all-args}"
)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List products matching the current search and category
    #[command(alias = "ls")]
    Products,

    /// Search products by name or SKU (no text clears the search)
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Show one category only, or `all`
    Category { filter: CategoryFilter },

    /// List the store's categories
    Categories,

    /// Add one unit of a product to the cart
    Add {
        #[arg(value_parser = product_id)]
        product: EntityId,
    },

    /// Increase a cart line by one
    Inc {
        #[arg(value_parser = product_id)]
        product: EntityId,
    },

    /// Decrease a cart line by one (removes it at zero)
    Dec {
        #[arg(value_parser = product_id)]
        product: EntityId,
    },

    /// Change a cart line's quantity by a step such as +3 or -2
    Qty {
        #[arg(value_parser = product_id)]
        product: EntityId,
        #[arg(value_parser = parse_quantity_delta, allow_negative_numbers = true)]
        delta: i64,
    },

    /// Remove a product from the cart
    Rm {
        #[arg(value_parser = product_id)]
        product: EntityId,
    },

    /// Empty the cart and deselect the customer
    Clear,

    /// Show the cart with totals
    Cart,

    /// Search customers by name or phone (at least 2 characters)
    Customer {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Select a customer from the last search
    Pick {
        #[arg(value_parser = customer_id)]
        customer: EntityId,
    },

    /// Deselect the customer
    Unpick,

    /// Open payment for the current cart
    Checkout,

    /// Choose the payment method: cash, upi or card
    Pay { method: PaymentMethod },

    /// Submit the order
    Confirm,

    /// Close payment and return to the cart
    Cancel,

    /// Show a receipt (defaults to the last order), optionally saving it
    Receipt {
        #[arg(value_parser = order_id)]
        order: Option<EntityId>,
        /// Write the receipt text to this file
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Fetch a receipt that failed to load again
    Retry,

    /// Reload store, products and categories
    Reload,

    /// Leave the terminal
    #[command(alias = "exit")]
    Quit,
}

fn product_id(raw: &str) -> Result<EntityId, ValidationError> {
    parse_entity_id("product id", raw)
}

fn customer_id(raw: &str) -> Result<EntityId, ValidationError> {
    parse_entity_id("customer id", raw)
}

fn order_id(raw: &str) -> Result<EntityId, ValidationError> {
    parse_entity_id("order id", raw)
}

/// Parses one prompt line. `help` and bad input come back as a clap error
/// whose rendering is the text to show.
pub fn parse_line(line: &str) -> Result<Command, clap::Error> {
    ReplLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
}
