use std::fmt::Display;

use serde::{Deserialize, Serialize};
use shop_common::Price;
use storefront_engine::db_types::{CartLine, OrderStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartAddRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// The cart as returned by `GET /api/cart`. The total is the sum of the stored line totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartContents {
    pub items: Vec<CartLine>,
    pub total: Price,
}

impl CartContents {
    pub fn new(items: Vec<CartLine>) -> Self {
        let total = items.iter().map(|line| line.total_price).sum();
        Self { items, total }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedResult {
    pub order_id: i64,
    pub total_amount: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangedResult {
    pub order_id: i64,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
}
