//! Storefront Engine
//!
//! The storefront engine holds the core logic for a small e-commerce backend: product stock, per-user
//! shopping carts, order placement and the order status lifecycle. It is HTTP-framework agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). Sqlite is the supported backend. You should never
//!    need to access the database directly. Instead, use the public API provided by the engine. The
//!    exception is the data types used in the database. These are defined in the `db_types` module and are
//!    public.
//! 2. The engine public API ([`mod@shop_api`]). This provides the public-facing functionality of the
//!    engine. It is responsible for carts, order placement and the order status lifecycle. Specific
//!    backends need to implement the traits in [`mod@traits`] in order to act as a backend for the
//!    storefront server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when
//! certain actions occur within the engine. For example, when an order moves through its status
//! lifecycle, an `OrderStatusChanged` event is emitted. A simple Actor framework is used so that you can
//! easily hook into these events and perform custom actions.

pub mod db_types;
pub mod events;
mod shop_api;
pub mod traits;
pub mod transitions;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    CartManagement,
    CatalogManagement,
    OrderFlowError,
    OrderManagement,
    StoreApiError,
    StorefrontDatabase,
    UserManagement,
};

pub use shop_api::{accounts_api::AccountApi, cart_api::CartApi, order_flow_api::OrderFlowApi, order_objects};
