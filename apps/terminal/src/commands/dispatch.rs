//! Runs parsed commands against the checkout session.

use tracing::{debug, info};

use till_api::PosBackend;
use till_core::{EntityId, MIN_CUSTOMER_QUERY_LEN};

use crate::commands::render;
use crate::commands::Command;
use crate::error::UiError;
use crate::state::{CheckoutSession, ReceiptSettings, ReceiptStatus, ScreenState};

/// What the REPL does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text and read the next line.
    Output(String),
    Quit,
}

impl Outcome {
    fn text(text: impl Into<String>) -> Self {
        Outcome::Output(text.into())
    }
}

/// Executes one command.
///
/// ## Errors
/// Every failure comes back as a [`UiError`] for the REPL to print; the
/// session stays usable.
pub async fn execute<B: PosBackend>(
    session: &mut CheckoutSession<B>,
    settings: &ReceiptSettings,
    command: Command,
) -> Result<Outcome, UiError> {
    debug!(?command, phase = %session.phase(), "Executing command");
    let symbol = settings.currency_symbol.as_str();

    let outcome = match command {
        // ---------------------------------------------------------------------
        // Catalog
        // ---------------------------------------------------------------------
        Command::Products => {
            session.require_ready()?;
            Outcome::Output(products(session, symbol))
        }
        Command::Search { text } => {
            session.require_ready()?;
            session.set_query(&text.join(" "))?;
            Outcome::Output(products(session, symbol))
        }
        Command::Category { filter } => {
            session.require_ready()?;
            session.set_category(filter)?;
            Outcome::Output(products(session, symbol))
        }
        Command::Categories => {
            session.require_ready()?;
            Outcome::Output(render::categories_table(session.catalog().categories()))
        }

        // ---------------------------------------------------------------------
        // Cart
        // ---------------------------------------------------------------------
        Command::Add { product } => {
            session.add_product(product)?;
            Outcome::Output(cart(session, symbol))
        }
        Command::Inc { product } => change_quantity(session, product, 1, symbol)?,
        Command::Dec { product } => change_quantity(session, product, -1, symbol)?,
        Command::Qty { product, delta } => change_quantity(session, product, delta, symbol)?,
        Command::Rm { product } => {
            if session.remove_product(product)? {
                Outcome::Output(cart(session, symbol))
            } else {
                Outcome::text(format!("Product #{} is not in the cart", product))
            }
        }
        Command::Clear => {
            session.clear_cart()?;
            Outcome::text("Cart cleared")
        }
        Command::Cart => Outcome::Output(cart(session, symbol)),

        // ---------------------------------------------------------------------
        // Customers
        // ---------------------------------------------------------------------
        Command::Customer { query } => {
            if query.is_empty() {
                match session.cart().customer() {
                    Some(c) => Outcome::text(format!("Customer: {}", c.label())),
                    None => Outcome::text("No customer selected"),
                }
            } else {
                let query = query.join(" ");
                session.search_customers(&query).await?;
                let too_short = query.trim().chars().count() < MIN_CUSTOMER_QUERY_LEN;
                if too_short {
                    Outcome::text(format!(
                        "Type at least {} characters to search customers",
                        MIN_CUSTOMER_QUERY_LEN
                    ))
                } else {
                    Outcome::Output(render::customers_table(session.customers().suggestions()))
                }
            }
        }
        Command::Pick { customer } => {
            session.select_customer(customer)?;
            let label = session
                .cart()
                .customer()
                .map(|c| c.label())
                .unwrap_or_default();
            Outcome::text(format!("Customer: {}", label))
        }
        Command::Unpick => {
            session.clear_customer();
            Outcome::text("Customer cleared")
        }

        // ---------------------------------------------------------------------
        // Checkout
        // ---------------------------------------------------------------------
        Command::Checkout => {
            session.request_checkout()?;
            Outcome::Output(format!(
                "{}\n\n{}",
                cart(session, symbol),
                render::payment_prompt(session.cart().total(), session.cart().payment_method(), symbol)
            ))
        }
        Command::Pay { method } => {
            session.set_payment_method(method)?;
            Outcome::Output(render::payment_prompt(
                session.cart().total(),
                session.cart().payment_method(),
                symbol,
            ))
        }
        Command::Confirm => {
            let order_id = session.confirm_payment().await?;
            let mut text = format!("Order #{} placed.", order_id);
            if let Some(view) = session.receipt().view() {
                text.push_str("\n\n");
                text.push_str(&render::receipt_text(&view, settings));
            }
            Outcome::Output(text)
        }
        Command::Cancel => {
            session.cancel_checkout()?;
            Outcome::text("Checkout cancelled; cart kept")
        }

        // ---------------------------------------------------------------------
        // Receipt
        // ---------------------------------------------------------------------
        Command::Receipt { order, out } => {
            match order {
                Some(order_id) => session.show_receipt(order_id).await?,
                None => match session.receipt().status() {
                    ReceiptStatus::Closed => {
                        return Err(UiError::validation("No receipt open; use `receipt <order-id>`"))
                    }
                    ReceiptStatus::Failed(message) => {
                        return Err(UiError::validation(format!(
                            "{}; use `retry` to fetch it again",
                            message
                        )))
                    }
                    ReceiptStatus::Loading | ReceiptStatus::Loaded(_) => {}
                },
            }
            receipt(session, settings, out).await?
        }
        Command::Retry => {
            session.retry_receipt().await?;
            receipt(session, settings, None).await?
        }

        // ---------------------------------------------------------------------
        // Session
        // ---------------------------------------------------------------------
        Command::Reload => {
            if session.catalog().store().is_some() && session.catalog().is_ready() {
                session.reload_catalog().await?;
            } else {
                session.load().await?;
            }
            Outcome::Output(status_line(session))
        }
        Command::Quit => Outcome::Quit,
    };

    Ok(outcome)
}

/// One-line summary of the screen state, shown at startup and on reload.
pub fn status_line<B: PosBackend>(session: &CheckoutSession<B>) -> String {
    match session.catalog().screen() {
        ScreenState::Loading => "Loading…".to_string(),
        ScreenState::NoStore => UiError::no_store().message,
        ScreenState::Error(message) => format!("{} (use `reload` to try again)", message),
        ScreenState::Ready => {
            let store = session
                .catalog()
                .store()
                .and_then(|s| s.brand.clone())
                .unwrap_or_else(|| "Store".to_string());
            let cashier = session
                .user()
                .and_then(|u| u.full_name.clone())
                .unwrap_or_else(|| "cashier".to_string());
            format!(
                "{} · {} · {} products, {} categories",
                store,
                cashier,
                session.catalog().products().len(),
                session.catalog().categories().len()
            )
        }
    }
}

fn products<B: PosBackend>(session: &CheckoutSession<B>, symbol: &str) -> String {
    let catalog = session.catalog();
    let mut heading = format!("Category: {}", catalog.category());
    if !catalog.query().is_empty() {
        heading.push_str(&format!("  Search: \"{}\"", catalog.query()));
    }
    format!(
        "{}\n{}",
        heading,
        render::products_table(&catalog.visible(), catalog.categories(), symbol)
    )
}

fn cart<B: PosBackend>(session: &CheckoutSession<B>, symbol: &str) -> String {
    render::cart_text(session.cart(), session.phase(), symbol)
}

fn change_quantity<B: PosBackend>(
    session: &mut CheckoutSession<B>,
    product: EntityId,
    delta: i64,
    symbol: &str,
) -> Result<Outcome, UiError> {
    if session.change_quantity(product, delta)? {
        Ok(Outcome::Output(cart(session, symbol)))
    } else {
        Ok(Outcome::text(format!("Product #{} is not in the cart", product)))
    }
}

async fn receipt<B: PosBackend>(
    session: &CheckoutSession<B>,
    settings: &ReceiptSettings,
    out: Option<std::path::PathBuf>,
) -> Result<Outcome, UiError> {
    let view = session
        .receipt()
        .view()
        .ok_or_else(|| UiError::validation("Receipt is not loaded"))?;
    let text = render::receipt_text(&view, settings);

    match out {
        Some(path) => {
            tokio::fs::write(&path, format!("{}\n", text))
                .await
                .map_err(|e| UiError::internal(format!("Could not write {}: {}", path.display(), e)))?;
            info!(order_id = view.meta.order_id, ?path, "Receipt saved");
            Ok(Outcome::text(format!("Receipt written to {}", path.display())))
        }
        None => Ok(Outcome::Output(text)),
    }
}
