//! Unified API for accessing users and their order histories.

use std::fmt::Debug;

use log::trace;
use shop_common::Price;

use crate::{
    db_types::User,
    shop_api::order_objects::{OrderHistory, OrderWithItems},
    traits::{OrderManagement, StoreApiError, UserManagement},
};

/// The `AccountApi` provides read access to users and their order histories.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: UserManagement + OrderManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the user with the given id. If no user exists, `None` is returned.
    pub async fn user_by_id(&self, user_id: i64) -> Result<Option<User>, StoreApiError> {
        self.db.fetch_user(user_id).await
    }

    /// Returns whether a user with the given id exists.
    pub async fn user_exists(&self, user_id: i64) -> Result<bool, StoreApiError> {
        Ok(self.db.fetch_user(user_id).await?.is_some())
    }

    /// Fetches the user's complete order history, newest order first, with line items and the sum
    /// of the orders' values.
    pub async fn order_history(&self, user_id: i64) -> Result<OrderHistory, StoreApiError> {
        trace!("🧑️ Fetching order history for user {user_id}");
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        let mut result = OrderHistory { user_id, total_orders: Price::default(), orders: Vec::with_capacity(orders.len()) };
        for order in orders {
            let items = self.db.fetch_order_items(order.id).await?;
            result.total_orders += order.total_amount;
            result.orders.push(OrderWithItems { order, items });
        }
        Ok(result)
    }
}
