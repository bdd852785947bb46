//! In-memory [`PosBackend`] used by the session and command tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use till_api::{ApiError, ApiResult, PosBackend};
use till_core::{
    Category, CategoryRef, Customer, EntityId, Money, OrderDraft, Product, Receipt, ReceiptItem,
    Store, User, UserRole,
};

pub struct FakeBackend {
    pub user: User,
    /// `None` answers the store lookup with 404.
    pub store: Option<Store>,
    pub products: Mutex<Vec<Product>>,
    /// `None` answers the categories call with a 500.
    pub categories: Option<Vec<Category>>,
    pub customers: Vec<Customer>,
    /// Rejection message for the next order, if any.
    pub reject_order: Mutex<Option<String>>,
    /// Number of order submissions that hit a 503 before one goes through.
    pub failing_orders: Mutex<u32>,
    /// Number of receipt fetches that fail before one succeeds.
    pub failing_receipts: Mutex<u32>,
    pub orders: Mutex<Vec<(OrderDraft, Uuid)>>,
    pub customer_queries: Mutex<Vec<String>>,
    pub product_loads: Mutex<u32>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        FakeBackend {
            user: User {
                id: 9,
                full_name: Some("Ravi".to_string()),
                email: None,
                role: UserRole::Cashier,
            },
            store: Some(Store {
                id: 2,
                brand: Some("Corner Shop".to_string()),
            }),
            products: Mutex::new(vec![
                product(1, "Tea", Some(1000), None, Some(20.0), Some(1)),
                product(2, "Bun", None, Some(500), None, Some(2)),
                product(3, "Teacake", Some(300), None, None, Some(2)),
            ]),
            categories: Some(vec![
                Category {
                    id: 1,
                    name: "Drinks".to_string(),
                    store_id: Some(2),
                },
                Category {
                    id: 2,
                    name: "Bakery".to_string(),
                    store_id: Some(2),
                },
            ]),
            customers: vec![
                Customer {
                    id: 4,
                    full_name: "Asha Rao".to_string(),
                    email: Some("asha@example.com".to_string()),
                    phone: None,
                },
                Customer {
                    id: 5,
                    full_name: "Aslam Khan".to_string(),
                    email: None,
                    phone: Some("98450 12345".to_string()),
                },
            ],
            reject_order: Mutex::new(None),
            failing_orders: Mutex::new(0),
            failing_receipts: Mutex::new(0),
            orders: Mutex::new(Vec::new()),
            customer_queries: Mutex::new(Vec::new()),
            product_loads: Mutex::new(0),
        }
    }
}

pub fn product(
    id: EntityId,
    name: &str,
    selling_cents: Option<i64>,
    mrp_cents: Option<i64>,
    discount: Option<f64>,
    category: Option<EntityId>,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        sku: Some(format!("SKU-{}", id)),
        category: category.map(|id| CategoryRef { id, name: None }),
        selling_price: selling_cents.map(Money::from_cents),
        mrp: mrp_cents.map(Money::from_cents),
        discount_percentage: discount,
        brand: None,
    }
}

fn receipt_for(order_id: EntityId, order: Option<&OrderDraft>) -> Receipt {
    let items = order
        .map(|o| {
            o.lines
                .iter()
                .map(|l| ReceiptItem {
                    product_name: format!("Product {}", l.product_id),
                    product_sku: None,
                    quantity: l.quantity,
                    original_price: l.price,
                    discount_percentage: None,
                    discount_amount: Money::zero(),
                    final_price: l.price,
                    line_total: l.price.multiply_quantity(l.quantity),
                })
                .collect()
        })
        .unwrap_or_default();
    let total = order.map(|o| o.total_amount).unwrap_or_default();

    Receipt {
        order_id,
        receipt_number: Some(format!("RCP-{}", order_id)),
        order_date: None,
        store_name: Some("Corner Shop".to_string()),
        store_address: None,
        store_phone: None,
        cashier_name: Some("Ravi".to_string()),
        customer_name: None,
        customer_phone: None,
        items,
        payment_type: order.map(|o| o.payment_method.to_string()),
        subtotal: Some(total),
        total_discount: Some(Money::zero()),
        total_amount: Some(total),
    }
}

const FIRST_ORDER_ID: EntityId = 500;

#[async_trait]
impl PosBackend for FakeBackend {
    async fn current_user(&self) -> ApiResult<User> {
        Ok(self.user.clone())
    }

    async fn resolve_store(&self, _user: &User) -> ApiResult<Store> {
        self.store
            .clone()
            .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))
    }

    async fn list_products(&self, _store_id: EntityId) -> ApiResult<Vec<Product>> {
        *self.product_loads.lock().unwrap() += 1;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn list_categories(&self, _store_id: EntityId) -> ApiResult<Vec<Category>> {
        self.categories.clone().ok_or_else(|| ApiError::Server {
            status: 500,
            message: "categories down".to_string(),
        })
    }

    async fn search_customers(&self, query: &str) -> ApiResult<Vec<Customer>> {
        self.customer_queries.lock().unwrap().push(query.to_string());
        let needle = query.to_lowercase();
        Ok(self
            .customers
            .iter()
            .filter(|c| c.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_order(&self, order: &OrderDraft, idempotency_key: Uuid) -> ApiResult<EntityId> {
        let mut orders = self.orders.lock().unwrap();
        orders.push((order.clone(), idempotency_key));
        if let Some(reason) = self.reject_order.lock().unwrap().take() {
            return Err(ApiError::BadRequest(reason));
        }
        {
            let mut failing = self.failing_orders.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(ApiError::Server {
                    status: 503,
                    message: "order service unavailable".to_string(),
                });
            }
        }
        Ok(FIRST_ORDER_ID + orders.len() as EntityId)
    }

    async fn fetch_receipt(&self, order_id: EntityId) -> ApiResult<Receipt> {
        {
            let mut failing = self.failing_receipts.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(ApiError::Server {
                    status: 503,
                    message: "receipt service unavailable".to_string(),
                });
            }
        }
        let orders = self.orders.lock().unwrap();
        let index = (order_id - FIRST_ORDER_ID - 1) as usize;
        Ok(receipt_for(order_id, orders.get(index).map(|(o, _)| o)))
    }
}
