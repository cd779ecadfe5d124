//! Store summary payload.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Number of items in each summary list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub products: usize,
    pub orders: usize,
    pub customers: usize,
}

/// Aggregated snapshot of a store's products, orders, and customers.
///
/// List items are passed through from the Admin API untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// `true` when the lists are static sample data rather than live results.
    pub demo: bool,
    pub counts: Counts,
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    pub customers: Vec<Value>,
}

impl Summary {
    /// Build a summary from live lists. Counts are derived from the lists.
    #[must_use]
    pub fn live(products: Vec<Value>, orders: Vec<Value>, customers: Vec<Value>) -> Self {
        Self::build(false, products, orders, customers)
    }

    /// The fixed sample payload shown when no live data could be fetched.
    #[must_use]
    pub fn demo() -> Self {
        let products = vec![
            json!({"id": 1, "title": "Demo T\u{2011}Shirt", "vendor": "ShopSync", "status": "active"}),
            json!({"id": 2, "title": "Demo Hoodie", "vendor": "ShopSync", "status": "draft"}),
        ];
        let orders = vec![
            json!({"id": 101, "name": "#1001", "financial_status": "paid", "total_price": "49.00"}),
            json!({"id": 102, "name": "#1002", "financial_status": "pending", "total_price": "98.00"}),
        ];
        let customers = vec![
            json!({"id": 201, "first_name": "Alex", "last_name": "Johnson", "email": "alex@example.com"}),
            json!({"id": 202, "first_name": "Sam", "last_name": "Lee", "email": "sam@example.com"}),
        ];

        Self::build(true, products, orders, customers)
    }

    fn build(demo: bool, products: Vec<Value>, orders: Vec<Value>, customers: Vec<Value>) -> Self {
        Self {
            demo,
            counts: Counts {
                products: products.len(),
                orders: orders.len(),
                customers: customers.len(),
            },
            products,
            orders,
            customers,
        }
    }
}
