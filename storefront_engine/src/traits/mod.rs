//! # Database management and control.
//!
//! This module provides the interface contracts of the storefront engine database *backends*.
//!
//! ## Traits
//! * [`StorefrontDatabase`] defines the highest level of behaviour for backends: the checkout
//!   transaction and the order status lifecycle.
//! * [`UserManagement`] provides read access to shopper records.
//! * [`CatalogManagement`] manages the product catalogue.
//! * [`CartManagement`] manages per-user cart rows.
//! * [`OrderManagement`] provides methods for querying orders and their line items.
mod cart_management;
mod catalog_management;
mod order_management;
mod storefront_database;
mod user_management;

mod errors;

pub use cart_management::CartManagement;
pub use catalog_management::CatalogManagement;
pub use errors::StoreApiError;
pub use order_management::OrderManagement;
pub use storefront_database::{OrderFlowError, StorefrontDatabase};
pub use user_management::UserManagement;
