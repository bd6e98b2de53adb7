//! # Storefront engine public API
//!
//! The `shop_api` module exposes the programmatic API for the storefront engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//!
//! * [`cart_api`] provides methods for reading and mutating per-user shopping carts.
//! * [`order_flow_api`] is the primary API for the checkout transaction and the order status lifecycle.
//! * [`accounts_api`] provides read access to users and their order histories.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend
//! that implements the specific backend traits required by the API.
//!
//! For example, to create an API instance to query a user's orders:
//!
//! ```rust,ignore
//! use storefront_engine::{AccountApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements UserManagement and OrderManagement
//! let api = AccountApi::new(db);
//! let history = api.order_history(user_id).await?;
//! ```

pub mod accounts_api;
pub mod cart_api;
pub mod order_flow_api;
pub mod order_objects;
