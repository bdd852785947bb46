//! # Text Rendering
//!
//! Tables for the catalog, cart and customer suggestions, and the fixed
//! receipt layout at the configured paper width.
//!
//! ## Receipt Layout (42 columns)
//! ```text
//! ==========================================
//!                CORNER SHOP
//!               12 Market Road
//!               Tel: 080 1234
//! ==========================================
//! Receipt: RCP-501
//! Date: 05/03/2024 14:07
//! Cashier: Ravi
//! ------------------------------------------
//! Tea
//!   SKU: TEA-1
//!   2 x $̶1̶0̶.̶0̶0̶ $8.00               $16.00
//!   -20% ($2.00)
//! ------------------------------------------
//! Subtotal:                          $20.00
//! Discount:                          -$4.00
//! TOTAL:                             $16.00
//! Payment: CASH
//! ==========================================
//!        Thank you for your purchase!
//! ```

use tabled::settings::Style;
use tabled::{Table, Tabled};

use till_core::{
    CartLedger, CartTotals, Category, Customer, EntityId, Money, PaymentMethod, PhaseKind, Product,
    ReceiptView,
};

use crate::state::ReceiptSettings;

// =============================================================================
// Table Rows
// =============================================================================

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: EntityId,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "DISCOUNT")]
    discount: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: EntityId,
    #[tabled(rename = "NAME")]
    name: String,
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: EntityId,
    #[tabled(rename = "ITEM")]
    name: String,
    #[tabled(rename = "QTY")]
    quantity: i64,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: EntityId,
    #[tabled(rename = "CUSTOMER")]
    label: String,
}

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

// =============================================================================
// Catalog
// =============================================================================

pub fn products_table(products: &[Product], categories: &[Category], symbol: &str) -> String {
    if products.is_empty() {
        return "No products match.".to_string();
    }

    let rows = products
        .iter()
        .map(|p| {
            let discount = p.discount();
            ProductRow {
                id: p.id,
                name: p.name.clone(),
                sku: p.sku.clone().unwrap_or_default(),
                category: p
                    .category_id()
                    .and_then(|id| categories.iter().find(|c| c.id == id))
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                price: if discount.is_zero() {
                    p.effective_price().format_with(symbol)
                } else {
                    format!(
                        "{} {}",
                        strike(&p.base_price().format_with(symbol)),
                        p.effective_price().format_with(symbol)
                    )
                },
                discount: if discount.is_zero() {
                    String::new()
                } else {
                    format!("-{}%", till_core::receipt::format_percentage(discount.percentage()))
                },
            }
        })
        .collect();

    table(rows)
}

pub fn categories_table(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.".to_string();
    }
    table(
        categories
            .iter()
            .map(|c| CategoryRow {
                id: c.id,
                name: c.name.clone(),
            })
            .collect(),
    )
}

pub fn customers_table(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers found.".to_string();
    }
    table(
        customers
            .iter()
            .map(|c| CustomerRow {
                id: c.id,
                label: c.label(),
            })
            .collect(),
    )
}

// =============================================================================
// Cart
// =============================================================================

pub fn cart_text(cart: &CartLedger, phase: PhaseKind, symbol: &str) -> String {
    let mut out = String::new();

    if cart.is_empty() {
        out.push_str("Cart is empty.\n");
    } else {
        let rows = cart
            .lines()
            .iter()
            .map(|l| CartRow {
                id: l.product_id(),
                name: l.product.name.clone(),
                quantity: l.quantity,
                price: if l.is_discounted() {
                    format!(
                        "{} {}",
                        strike(&l.base_price.format_with(symbol)),
                        l.effective_price.format_with(symbol)
                    )
                } else {
                    l.effective_price.format_with(symbol)
                },
                total: l.line_total().format_with(symbol),
            })
            .collect();
        out.push_str(&table(rows));
        out.push('\n');
    }

    let totals = CartTotals::from(cart);
    out.push_str(&format!(
        "Items: {} ({} units)\n",
        totals.item_count, totals.total_quantity
    ));
    out.push_str(&format!("Subtotal: {}\n", totals.subtotal.format_with(symbol)));
    if totals.total_discount.is_positive() {
        out.push_str(&format!(
            "Discount: -{}\n",
            totals.total_discount.format_with(symbol)
        ));
    }
    out.push_str(&format!("Total: {}\n", totals.total.format_with(symbol)));

    if let Some(customer) = cart.customer() {
        out.push_str(&format!("Customer: {}\n", customer.label()));
    }
    if phase != PhaseKind::Browsing {
        out.push_str(&format!("Payment: {}\n", cart.payment_method()));
    }
    out.trim_end().to_string()
}

/// The payment prompt shown when checkout opens.
pub fn payment_prompt(total: Money, selected: PaymentMethod, symbol: &str) -> String {
    let methods: Vec<String> = PaymentMethod::ALL
        .iter()
        .map(|m| {
            if *m == selected {
                format!("[{}]", m)
            } else {
                m.to_string()
            }
        })
        .collect();
    format!(
        "Amount due: {}\nPayment: {}\nUse `pay <cash|upi|card>`, then `confirm` (or `cancel`).",
        total.format_with(symbol),
        methods.join("  ")
    )
}

// =============================================================================
// Receipt
// =============================================================================

const STRIKE: char = '\u{0336}';

/// Strikes text through with combining overlays.
fn strike(text: &str) -> String {
    text.chars().flat_map(|c| [c, STRIKE]).collect()
}

/// Columns the text occupies; combining overlays take none.
fn display_width(text: &str) -> usize {
    text.chars().filter(|c| *c != STRIKE).count()
}

fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        if c != STRIKE {
            if used + 1 >= width {
                break;
            }
            used += 1;
        }
        out.push(c);
    }
    out.push('…');
    out
}

fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let pad = width.saturating_sub(display_width(&text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// `left` and `right` on one line, pushed to the paper edges.
fn justify(left: &str, right: &str, width: usize) -> String {
    let gap = width.saturating_sub(display_width(left) + display_width(right));
    if gap == 0 {
        return format!("{}\n{}{}", left, " ".repeat(width.saturating_sub(display_width(right))), right);
    }
    format!("{}{}{}", left, " ".repeat(gap), right)
}

/// Renders a receipt at the configured paper width.
pub fn receipt_text(view: &ReceiptView, settings: &ReceiptSettings) -> String {
    let width = settings.paper_width;
    let symbol = settings.currency_symbol.as_str();
    let heavy = "=".repeat(width);
    let light = "-".repeat(width);
    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy.clone());
    lines.push(center(&view.header.store_name, width));
    if let Some(address) = &view.header.address {
        lines.push(center(address, width));
    }
    if let Some(phone) = &view.header.phone {
        lines.push(center(phone, width));
    }
    lines.push(heavy.clone());

    lines.push(truncate(&format!("Receipt: {}", view.meta.number), width));
    if let Some(date) = &view.meta.date {
        lines.push(format!("Date: {}", date));
    }
    if let Some(cashier) = &view.meta.cashier {
        lines.push(truncate(&format!("Cashier: {}", cashier), width));
    }
    if let Some(customer) = &view.meta.customer {
        lines.push(truncate(&format!("Customer: {}", customer), width));
    }
    if let Some(phone) = &view.meta.customer_phone {
        lines.push(truncate(&format!("Phone: {}", phone), width));
    }
    lines.push(light.clone());

    for line in &view.lines {
        lines.push(truncate(&line.name, width));
        if let Some(sku) = &line.sku {
            lines.push(truncate(&format!("  SKU: {}", sku), width));
        }
        let unit = match line.original_price {
            Some(original) => format!(
                "{} {}",
                strike(&original.format_with(symbol)),
                line.unit_price.format_with(symbol)
            ),
            None => line.unit_price.format_with(symbol),
        };
        lines.push(justify(
            &format!("  {} x {}", line.quantity, unit),
            &line.line_total.format_with(symbol),
            width,
        ));
        if let Some(label) = line.discount_label(symbol) {
            lines.push(format!("  {}", label));
        }
    }
    lines.push(light);

    lines.push(justify("Subtotal:", &view.totals.subtotal.format_with(symbol), width));
    if let Some(discount) = view.totals.discount {
        lines.push(justify(
            "Discount:",
            &format!("-{}", discount.format_with(symbol)),
            width,
        ));
    }
    lines.push(justify("TOTAL:", &view.totals.total.format_with(symbol), width));
    if let Some(method) = &view.totals.payment_method {
        lines.push(format!("Payment: {}", method));
    }
    lines.push(heavy);

    for footer in &view.footer {
        lines.push(center(footer, width));
    }

    lines.join("\n")
}
