use crate::{
    db_types::{Order, OrderItem},
    traits::StoreApiError,
};

/// Query-side access to orders and their line items. All mutation goes through
/// [`StorefrontDatabase`](super::StorefrontDatabase).
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order with the given id. If no order exists, `None` is returned.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, StoreApiError>;

    /// Fetches the line items belonging to the given order.
    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreApiError>;

    /// Fetches all orders placed by the given user, newest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreApiError>;
}
