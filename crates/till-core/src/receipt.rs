//! # Receipt Formatter
//!
//! Pure projection of a backend [`Receipt`] into the blocks a receipt is
//! printed from. Nothing is recomputed: every amount shown is the amount the
//! backend sent, so formatting the same receipt twice gives identical output.
//!
//! ## Layout
//! ```text
//! ┌───────────────────────────────┐
//! │         CORNER SHOP           │  header  (store name uppercased,
//! │        12 High Street         │           address, "Tel: " phone)
//! │         Tel: 555-0100         │
//! ├───────────────────────────────┤
//! │ Order ID:            RCP-42   │  meta    (number, date, cashier,
//! │ Date:      05/03/2024 14:07   │           customer)
//! │ Cashier:               Ravi   │
//! ├───────────────────────────────┤
//! │ Item        Qty  Price  Total │  lines   (~~original~~ only when
//! │ Tea           2  ~~$10~~      │           discounted)
//! │  -20% ($2.00)     $8.00 $16.00│
//! ├───────────────────────────────┤
//! │ Subtotal:              $20.00 │  totals  (discount row only if > 0)
//! │ Total Discount:        -$4.00 │
//! │ TOTAL:                 $16.00 │
//! │ Payment Method:           UPI │
//! ├───────────────────────────────┤
//! │ Thank you for your purchase!  │  footer
//! └───────────────────────────────┘
//! ```

use serde::Serialize;

use crate::money::Money;
use crate::types::{EntityId, Receipt, ReceiptItem};

/// Timestamp layout on printed receipts.
pub const RECEIPT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

const STORE_NAME_FALLBACK: &str = "STORE";

// =============================================================================
// View Types
// =============================================================================

/// Store identity block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptHeader {
    pub store_name: String,
    pub address: Option<String>,
    /// Already prefixed with `Tel: `.
    pub phone: Option<String>,
}

/// Order metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptMeta {
    pub order_id: EntityId,
    /// Receipt number, or the order id when the backend sent none.
    pub number: String,
    pub date: Option<String>,
    pub cashier: Option<String>,
    pub customer: Option<String>,
    pub customer_phone: Option<String>,
}

/// Discount applied to one receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDiscount {
    /// Percentage as printed, e.g. `"12.5"`.
    pub percentage: String,
    /// Discount per unit.
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub sku: Option<String>,
    pub quantity: i64,
    /// Struck-through price, present only when the line was discounted.
    pub original_price: Option<Money>,
    pub unit_price: Money,
    pub discount: Option<LineDiscount>,
    pub line_total: Money,
}

impl ReceiptLine {
    /// `-20% ($2.00)` style label, when discounted.
    pub fn discount_label(&self, symbol: &str) -> Option<String> {
        self.discount
            .as_ref()
            .map(|d| format!("-{}% ({})", d.percentage, d.amount.format_with(symbol)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptTotals {
    pub subtotal: Money,
    /// Present only when the total discount is greater than zero.
    pub discount: Option<Money>,
    pub total: Money,
    pub payment_method: Option<String>,
}

/// Everything needed to print one receipt, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptView {
    pub header: ReceiptHeader,
    pub meta: ReceiptMeta,
    pub lines: Vec<ReceiptLine>,
    pub totals: ReceiptTotals,
    pub footer: Vec<String>,
}

// =============================================================================
// Formatting
// =============================================================================

/// Builds the printable view of `receipt`.
pub fn format_receipt(receipt: &Receipt) -> ReceiptView {
    let number = non_blank(receipt.receipt_number.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| receipt.order_id.to_string());

    let header = ReceiptHeader {
        store_name: non_blank(receipt.store_name.as_deref())
            .map(str::to_uppercase)
            .unwrap_or_else(|| STORE_NAME_FALLBACK.to_string()),
        address: non_blank(receipt.store_address.as_deref()).map(str::to_string),
        phone: non_blank(receipt.store_phone.as_deref()).map(|p| format!("Tel: {}", p)),
    };

    let meta = ReceiptMeta {
        order_id: receipt.order_id,
        number: number.clone(),
        date: receipt
            .order_date
            .map(|d| d.format(RECEIPT_DATE_FORMAT).to_string()),
        cashier: non_blank(receipt.cashier_name.as_deref()).map(str::to_string),
        customer: non_blank(receipt.customer_name.as_deref()).map(str::to_string),
        customer_phone: non_blank(receipt.customer_phone.as_deref()).map(str::to_string),
    };

    let totals = ReceiptTotals {
        subtotal: receipt.subtotal.unwrap_or_default(),
        discount: receipt.total_discount.filter(|d| d.is_positive()),
        total: receipt.total_amount.unwrap_or_default(),
        payment_method: non_blank(receipt.payment_type.as_deref()).map(str::to_uppercase),
    };

    let mut footer = vec![
        "Thank you for your purchase!".to_string(),
        "Please visit us again.".to_string(),
    ];
    if non_blank(receipt.receipt_number.as_deref()).is_some() {
        footer.push(number);
    }

    ReceiptView {
        header,
        meta,
        lines: receipt.items.iter().map(format_line).collect(),
        totals,
        footer,
    }
}

fn format_line(item: &ReceiptItem) -> ReceiptLine {
    let discounted = item.discount_amount.is_positive();
    ReceiptLine {
        name: item.product_name.clone(),
        sku: non_blank(item.product_sku.as_deref()).map(str::to_string),
        quantity: item.quantity,
        original_price: discounted.then_some(item.original_price),
        unit_price: item.final_price,
        discount: discounted.then(|| LineDiscount {
            percentage: format_percentage(item.discount_percentage.unwrap_or_default()),
            amount: item.discount_amount,
        }),
        line_total: item.line_total,
    }
}

/// Prints a percentage with at most two decimals and no trailing zeros.
///
/// `20.0` → `"20"`, `12.50` → `"12.5"`, `33.333` → `"33.33"`.
pub fn format_percentage(pct: f64) -> String {
    if !pct.is_finite() {
        return "0".to_string();
    }
    let hundredths = (pct * 100.0).round() as i64;
    let whole = hundredths / 100;
    let frac = (hundredths % 100).abs();
    let sign = if hundredths < 0 && whole == 0 { "-" } else { "" };
    match frac {
        0 => format!("{}{}", sign, whole),
        f if f % 10 == 0 => format!("{}{}.{}", sign, whole, f / 10),
        f => format!("{}{}.{:02}", sign, whole, f),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Receipt {
        serde_json::from_str(
            r#"{
                "orderId": 42,
                "receiptNumber": "RCP-42",
                "orderDate": "2024-03-05T14:07:31",
                "storeName": "Corner Shop",
                "storeAddress": "12 High Street",
                "storePhone": "555-0100",
                "cashierName": "Ravi",
                "customerName": "Asha",
                "items": [
                    {
                        "productName": "Tea", "productSku": "TEA-1", "quantity": 2,
                        "originalPrice": 10.0, "discountPercentage": 20.0, "discountAmount": 2.0,
                        "finalPrice": 8.0, "lineTotal": 16.0
                    },
                    {
                        "productName": "Bun", "quantity": 1,
                        "originalPrice": 5.0, "discountPercentage": 0.0, "discountAmount": 0.0,
                        "finalPrice": 5.0, "lineTotal": 5.0
                    }
                ],
                "paymentType": "upi",
                "subtotal": 25.0, "totalDiscount": 4.0, "totalAmount": 21.0
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_header_block() {
        let view = format_receipt(&sample());
        assert_eq!(view.header.store_name, "CORNER SHOP");
        assert_eq!(view.header.address.as_deref(), Some("12 High Street"));
        assert_eq!(view.header.phone.as_deref(), Some("Tel: 555-0100"));
    }

    #[test]
    fn test_meta_block() {
        let view = format_receipt(&sample());
        assert_eq!(view.meta.number, "RCP-42");
        assert_eq!(view.meta.date.as_deref(), Some("05/03/2024 14:07"));
        assert_eq!(view.meta.cashier.as_deref(), Some("Ravi"));
        assert_eq!(view.meta.customer.as_deref(), Some("Asha"));
    }

    #[test]
    fn test_number_falls_back_to_order_id() {
        let mut receipt = sample();
        receipt.receipt_number = None;
        let view = format_receipt(&receipt);
        assert_eq!(view.meta.number, "42");
        assert!(!view.footer.contains(&"42".to_string()));
    }

    #[test]
    fn test_blank_number_falls_back_without_footer() {
        let mut receipt = sample();
        receipt.receipt_number = Some("  ".to_string());
        let view = format_receipt(&receipt);
        assert_eq!(view.meta.number, "42");
        assert_eq!(view.footer.len(), 2);
    }

    #[test]
    fn test_original_price_only_on_discounted_lines() {
        let view = format_receipt(&sample());
        let tea = &view.lines[0];
        assert_eq!(tea.original_price, Some(Money::from_cents(1000)));
        assert_eq!(tea.unit_price, Money::from_cents(800));
        assert_eq!(tea.discount_label("$").as_deref(), Some("-20% ($2.00)"));

        let bun = &view.lines[1];
        assert_eq!(bun.original_price, None);
        assert_eq!(bun.discount, None);
        assert_eq!(bun.sku, None);
    }

    #[test]
    fn test_totals_taken_as_given() {
        let mut receipt = sample();
        receipt.total_amount = Some(Money::from_cents(9999));
        let view = format_receipt(&receipt);
        assert_eq!(view.totals.subtotal, Money::from_cents(2500));
        assert_eq!(view.totals.discount, Some(Money::from_cents(400)));
        assert_eq!(view.totals.total, Money::from_cents(9999));
        assert_eq!(view.totals.payment_method.as_deref(), Some("UPI"));
    }

    #[test]
    fn test_zero_discount_row_hidden() {
        let mut receipt = sample();
        receipt.total_discount = Some(Money::zero());
        assert_eq!(format_receipt(&receipt).totals.discount, None);
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let receipt = sample();
        assert_eq!(format_receipt(&receipt), format_receipt(&receipt));
    }

    #[test]
    fn test_minimal_receipt() {
        let receipt: Receipt = serde_json::from_str(r#"{ "orderId": 7 }"#).unwrap();
        let view = format_receipt(&receipt);
        assert_eq!(view.header.store_name, "STORE");
        assert_eq!(view.meta.number, "7");
        assert_eq!(view.meta.date, None);
        assert!(view.lines.is_empty());
        assert_eq!(view.totals.total, Money::zero());
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(20.0), "20");
        assert_eq!(format_percentage(12.5), "12.5");
        assert_eq!(format_percentage(33.333), "33.33");
        assert_eq!(format_percentage(0.05), "0.05");
        assert_eq!(format_percentage(f64::NAN), "0");
    }
}
