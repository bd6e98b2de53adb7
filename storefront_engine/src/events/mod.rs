mod channel;
mod dispatcher;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use dispatcher::{Notification, NotificationDispatcher};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
