//! Per-user notification fan-out.
//!
//! The dispatcher keeps one broadcast topic per user id. Publishing to a user delivers the message
//! to every live subscriber of that user's topic; publishing to a user with no subscribers drops
//! the message silently. Notification delivery is strictly best-effort and never feeds back into
//! the order flow.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use log::*;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered messages per topic. A subscriber that lags further behind than this loses the oldest
/// messages rather than blocking the publisher.
const TOPIC_BUFFER_SIZE: usize = 32;

/// The wire format of a push notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl Notification {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { kind: "notification".to_string(), message: message.into() }
    }

    /// The message for an order status change, e.g.
    /// `Your order #42 status changed from Pending to Shipped.`
    pub fn order_status_changed(order_id: i64, from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::new(format!("Your order #{order_id} status changed from {from} to {to}."))
    }
}

#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    topics: Arc<Mutex<HashMap<i64, broadcast::Sender<Notification>>>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn topics(&self) -> MutexGuard<'_, HashMap<i64, broadcast::Sender<Notification>>> {
        // A poisoned lock only means a panic happened mid-insert; the map itself is still usable.
        self.topics.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens a subscription to `user_id`'s notifications. The topic is created on first use.
    pub fn subscribe(&self, user_id: i64) -> broadcast::Receiver<Notification> {
        let mut topics = self.topics();
        let sender = topics.entry(user_id).or_insert_with(|| broadcast::channel(TOPIC_BUFFER_SIZE).0);
        debug!("📨️ New subscription for user {user_id} ({} existing)", sender.receiver_count());
        sender.subscribe()
    }

    /// Delivers `notification` to every live subscriber of `user_id`. Topics whose last subscriber
    /// has gone away are pruned here.
    pub fn publish(&self, user_id: i64, notification: Notification) {
        let mut topics = self.topics();
        match topics.get(&user_id) {
            Some(sender) => match sender.send(notification) {
                Ok(n) => trace!("📨️ Notification delivered to {n} subscriber(s) of user {user_id}"),
                Err(_) => {
                    topics.remove(&user_id);
                    debug!("📨️ All subscribers of user {user_id} are gone. Notification dropped.");
                },
            },
            None => debug!("📨️ User {user_id} has no subscribers. Notification dropped."),
        }
    }

    /// The number of live subscribers for the given user.
    pub fn subscriber_count(&self, user_id: i64) -> usize {
        self.topics().get(&user_id).map(|s| s.receiver_count()).unwrap_or(0)
    }
}
