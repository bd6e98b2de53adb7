use serde::{Deserialize, Serialize};
use shop_common::Price;

use crate::db_types::{Order, OrderItem};

/// An order together with its line items, as returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A user's complete order history, with the sum of the orders' values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistory {
    pub user_id: i64,
    pub total_orders: Price,
    pub orders: Vec<OrderWithItems>,
}
