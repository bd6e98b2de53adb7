//! The order status state machine.
//!
//! The full transition table lives in [`next_status`] and nowhere else. Callers validate a requested
//! transition here first and only then write the new state, so an illegal request never touches the
//! database.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Invalid status transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Returns the state an order in `current` may move to when `requested` is asked for.
///
/// `Pending` orders may be shipped, or delivered directly. `Shipped` orders may only be delivered.
/// `Delivered` is terminal. Requesting the state the order is already in is rejected like any other
/// illegal edge.
pub fn next_status(current: OrderStatus, requested: OrderStatus) -> Result<OrderStatus, InvalidTransition> {
    use OrderStatus::*;
    match (current, requested) {
        (Pending, Shipped) | (Pending, Delivered) | (Shipped, Delivered) => Ok(requested),
        (from, to) => Err(InvalidTransition { from, to }),
    }
}
