//! Wire shapes that exist only on the HTTP boundary.
//!
//! Domain types that the backend returns as-is (`Product`, `Customer`,
//! `Receipt`, ...) deserialize straight into till-core types. The structs
//! here cover the request bodies and the envelopes around them.

use serde::{Deserialize, Serialize};
use till_core::money::{decimal, Money};
use till_core::{EntityId, OrderDraft, OrderLine, PaymentMethod};

/// `POST /api/orders` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub store_id: EntityId,
    /// Serialized as `null` for walk-in sales.
    pub customer_id: Option<EntityId>,
    pub cashier: CashierRef,
    pub payment_type: PaymentMethod,
    #[serde(with = "decimal")]
    pub total_amount: Money,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashierRef {
    pub id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: EntityId,
    pub quantity: i64,
    /// Effective unit price.
    #[serde(with = "decimal")]
    pub price: Money,
}

impl From<&OrderLine> for OrderItemRequest {
    fn from(line: &OrderLine) -> Self {
        OrderItemRequest {
            product_id: line.product_id,
            quantity: line.quantity,
            price: line.price,
        }
    }
}

impl From<&OrderDraft> for OrderRequest {
    fn from(order: &OrderDraft) -> Self {
        OrderRequest {
            store_id: order.store_id,
            customer_id: order.customer_id,
            cashier: CashierRef {
                id: order.cashier_id,
            },
            payment_type: order.payment_method,
            total_amount: order.total_amount,
            items: order.lines.iter().map(OrderItemRequest::from).collect(),
        }
    }
}

/// The part of the created order the terminal needs.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreated {
    pub id: EntityId,
}

/// Error body the backend sends with 4xx/5xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_request_wire_shape() {
        let draft = OrderDraft {
            store_id: 3,
            customer_id: None,
            cashier_id: 9,
            payment_method: PaymentMethod::Upi,
            total_amount: Money::from_cents(2100),
            lines: vec![
                OrderLine {
                    product_id: 1,
                    quantity: 2,
                    price: Money::from_cents(800),
                },
                OrderLine {
                    product_id: 2,
                    quantity: 1,
                    price: Money::from_cents(500),
                },
            ],
        };

        let body = serde_json::to_value(OrderRequest::from(&draft)).unwrap();
        assert_eq!(
            body,
            json!({
                "storeId": 3,
                "customerId": null,
                "cashier": { "id": 9 },
                "paymentType": "UPI",
                "totalAmount": 21.0,
                "items": [
                    { "productId": 1, "quantity": 2, "price": 8.0 },
                    { "productId": 2, "quantity": 1, "price": 5.0 }
                ]
            })
        );
    }

    #[test]
    fn test_order_created_ignores_extra_fields() {
        let created: OrderCreated =
            serde_json::from_str(r#"{ "id": 77, "totalAmount": 21.0, "items": [] }"#).unwrap();
        assert_eq!(created.id, 77);
    }
}
