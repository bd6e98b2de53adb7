//! # Storefront server
//!
//! This module hosts the HTTP layer of the storefront. It is responsible for:
//! * Authenticating shoppers and admins via JWT access tokens.
//! * Exposing the cart, checkout and order management routes.
//! * Streaming per-user order notifications over server-sent events.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/cart`, `/api/order`, `/api/orders`: the authenticated shopper routes.
//! * `/api/order/{id}/status`: the admin route for moving orders through their lifecycle.
//! * `/notifications/{user_id}`: the server-sent events notification stream.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
