use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderChanged, OrderStatus};

/// Emitted after a status change has been committed to the database. Handlers therefore never see
/// a change that was subsequently rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub order: Order,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
}

impl OrderStatusChangedEvent {
    pub fn new(order: Order, old_status: OrderStatus, new_status: OrderStatus) -> Self {
        Self { order, old_status, new_status }
    }
}

impl From<OrderChanged> for OrderStatusChangedEvent {
    fn from(changed: OrderChanged) -> Self {
        Self { order: changed.order, old_status: changed.old_status, new_status: changed.new_status }
    }
}
