use thiserror::Error;

use crate::{
    db_types::{Order, OrderChanged, OrderItem, OrderStatus},
    traits::{CartManagement, CatalogManagement, OrderManagement, StoreApiError, UserManagement},
    transitions::InvalidTransition,
};

/// This trait defines the highest level of behaviour for backends supporting the storefront engine.
///
/// This behaviour includes:
/// * The checkout transaction, which converts a cart into an order atomically.
/// * The order status lifecycle.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase:
    Clone + UserManagement + CatalogManagement + CartManagement + OrderManagement
{
    /// The URL of the database
    fn url(&self) -> &str;

    /// Converts the user's cart into an order in a single atomic transaction:
    ///
    /// * The cart is loaded. An empty cart aborts with [`OrderFlowError::EmptyCart`].
    /// * Stock is reserved for every line. A line that cannot be covered aborts the whole
    ///   transaction with [`OrderFlowError::InsufficientStock`]; no partial orders exist, even
    ///   transiently.
    /// * The order and its line items are written, the total is accumulated from the stored line
    ///   totals, and the cart is cleared.
    ///
    /// Either every effect is visible afterwards, or none are. A transaction that fails purely due
    /// to lock contention is retried once before [`OrderFlowError::Busy`] is returned; business
    /// failures are never retried.
    async fn place_order(&self, user_id: i64) -> Result<(Order, Vec<OrderItem>), OrderFlowError>;

    /// Moves an order to `new_status`, enforcing the transition table in
    /// [`crate::transitions::next_status`].
    ///
    /// The transition is validated against the currently stored state before anything is written,
    /// and the write itself is guarded on that same state. If a concurrent update wins the race,
    /// the request is re-validated against the fresh state, so of two racing legal requests one
    /// observes the other's result.
    async fn update_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<OrderChanged, OrderFlowError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderFlowError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Cannot place an order from an empty cart")]
    EmptyCart,
    #[error("Insufficient stock for {product_name}: {available} available, {requested} requested")]
    InsufficientStock { product_name: String, available: i64, requested: i64 },
    #[error("{0}")]
    InvalidTransition(#[from] InvalidTransition),
    #[error("{0}")]
    StoreError(#[from] StoreApiError),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("The requested user {0} does not exist")]
    UserNotFound(i64),
    #[error("The database is busy; the operation lost a lock contention race")]
    Busy,
}

impl From<sqlx::Error> for OrderFlowError {
    fn from(e: sqlx::Error) -> Self {
        if is_lock_contention(&e) {
            OrderFlowError::Busy
        } else {
            OrderFlowError::DatabaseError(e.to_string())
        }
    }
}

/// SQLITE_BUSY (5) and SQLITE_BUSY_SNAPSHOT (517) mark transactions that failed only because a
/// concurrent writer held the database, and are therefore safe to retry.
fn is_lock_contention(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "5" || code == "517")
        .unwrap_or(false)
}
