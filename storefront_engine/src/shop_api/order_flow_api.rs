use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderChanged, OrderItem, OrderStatus},
    events::{EventProducers, OrderStatusChangedEvent},
    traits::{OrderFlowError, StorefrontDatabase},
};

/// `OrderFlowApi` is the primary API for the checkout transaction and the order status lifecycle.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: StorefrontDatabase
{
    /// Converts the user's cart into a new `Pending` order in a single atomic transaction.
    ///
    /// Order creation is deliberately silent; only subsequent status changes emit an event.
    pub async fn place_order(&self, user_id: i64) -> Result<(Order, Vec<OrderItem>), OrderFlowError> {
        let (order, items) = self.db.place_order(user_id).await?;
        debug!("🔄️📦️ Order #{} placed for user {user_id}. {} line items, total {}", order.id, items.len(), order.total_amount);
        Ok((order, items))
    }

    /// Moves an order to `new_status`, enforcing the status transition table. On success, the
    /// `OrderStatusChanged` event hook fires with the committed change.
    pub async fn update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<OrderChanged, OrderFlowError> {
        let changed = self.db.update_order_status(order_id, new_status).await?;
        self.call_status_changed_hook(&changed);
        debug!("🔄️📦️ Order #{order_id} moved from {} to {}", changed.old_status, changed.new_status);
        Ok(changed)
    }

    // Event delivery is best-effort. A slow handler must never hold up the status update response.
    fn call_status_changed_hook(&self, changed: &OrderChanged) {
        for emitter in &self.producers.order_status_changed_producer {
            trace!("🔄️📦️ Notifying order status changed hook subscribers");
            let event = OrderStatusChangedEvent::from(changed.clone());
            emitter.try_publish_event(event);
        }
    }

    /// Returns a reference to the underlying database backend.
    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
