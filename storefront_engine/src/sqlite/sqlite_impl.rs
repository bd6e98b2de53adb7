//! `SqliteDatabase` is a concrete implementation of a storefront engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use shop_common::Price;
use sqlx::SqlitePool;

use super::db::{cart, db_url, new_pool, orders, products, users};
use crate::{
    db_types::{CartItem, CartLine, NewProduct, Order, OrderChanged, OrderItem, OrderStatus, Product, User},
    traits::{
        CartManagement,
        CatalogManagement,
        OrderFlowError,
        OrderManagement,
        StoreApiError,
        StorefrontDatabase,
        UserManagement,
    },
    transitions::{next_status, InvalidTransition},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl StorefrontDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn place_order(&self, user_id: i64) -> Result<(Order, Vec<OrderItem>), OrderFlowError> {
        match self.try_place_order(user_id).await {
            Err(OrderFlowError::Busy) => {
                debug!("🗃️ Checkout for user {user_id} lost a lock race. Retrying once.");
                self.try_place_order(user_id).await
            },
            result => result,
        }
    }

    async fn update_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<OrderChanged, OrderFlowError> {
        match self.try_update_order_status(order_id, new_status).await {
            Err(OrderFlowError::Busy) => {
                debug!("🗃️ Status update for order {order_id} lost a lock race. Retrying once.");
                self.try_update_order_status(order_id, new_status).await
            },
            result => result,
        }
    }

    async fn close(&mut self) -> Result<(), OrderFlowError> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteDatabase {
    /// The checkout transaction. Every write either commits with the rest, or is rolled back when
    /// the transaction is dropped on early return.
    async fn try_place_order(&self, user_id: i64) -> Result<(Order, Vec<OrderItem>), OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let cart = cart::items_for_user(user_id, &mut tx).await?;
        if cart.is_empty() {
            return Err(OrderFlowError::EmptyCart);
        }
        let order = orders::insert_order(user_id, &mut tx).await?;
        let mut items = Vec::with_capacity(cart.len());
        let mut total = Price::default();
        for line in &cart {
            let reserved = products::reserve_stock(line.product_id, line.quantity, &mut tx).await?;
            if !reserved {
                let product = products::product_by_id(line.product_id, &mut tx)
                    .await?
                    .ok_or(StoreApiError::ProductNotFound(line.product_id))?;
                debug!(
                    "🗃️ Checkout for user {user_id} aborted: {} has {} units left, {} requested",
                    product.name, product.stock, line.quantity
                );
                return Err(OrderFlowError::InsufficientStock {
                    product_name: product.name,
                    available: product.stock,
                    requested: line.quantity,
                });
            }
            let item =
                orders::insert_order_item(order.id, line.product_id, line.quantity, line.total_price, &mut tx).await?;
            total += line.total_price;
            items.push(item);
        }
        let order = orders::set_total_amount(order.id, total, &mut tx).await?;
        cart::clear_for_user(user_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order #{} placed for user {user_id}. Total: {total}", order.id);
        Ok((order, items))
    }

    /// Validate-then-commit: the transition is checked against the stored status before any write,
    /// and the `UPDATE` itself is guarded on that same status. Losing the guard race means a
    /// concurrent update changed the order first, so the request is re-validated against the fresh
    /// state exactly once.
    async fn try_update_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<OrderChanged, OrderFlowError> {
        for _ in 0..2 {
            let mut tx = self.pool.begin().await?;
            let order =
                orders::order_by_id(order_id, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
            let old_status = order.status;
            let target = next_status(old_status, new_status)?;
            match orders::update_status_guarded(order_id, old_status, target, &mut tx).await? {
                Some(order) => {
                    tx.commit().await?;
                    info!("🗃️ Order #{order_id} moved from {old_status} to {target}");
                    return Ok(OrderChanged { order, old_status, new_status: target });
                },
                None => {
                    debug!("🗃️ Order #{order_id} was updated concurrently. Re-checking the transition.");
                },
            }
        }
        // Two guard misses in a row; report the failure against whatever is stored now.
        let mut conn = self.pool.acquire().await?;
        let order = orders::order_by_id(order_id, &mut conn).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        Err(InvalidTransition { from: order.status, to: new_status }.into())
    }

    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl UserManagement for SqliteDatabase {
    async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::user_by_id(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn insert_user(&self, username: &str, is_staff: bool) -> Result<User, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::insert_user(username, is_staff, &mut conn).await?;
        Ok(user)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::product_by_id(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::insert_product(product, &mut conn).await?;
        debug!("🗃️ Product \"{}\" has been saved in the DB with id {}", product.name, product.id);
        Ok(product)
    }

    async fn update_product_price(&self, product_id: i64, new_price: Price) -> Result<Product, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::update_price(product_id, new_price, &mut conn)
            .await?
            .ok_or(StoreApiError::ProductNotFound(product_id))?;
        Ok(product)
    }
}

impl CartManagement for SqliteDatabase {
    async fn upsert_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, StoreApiError> {
        let mut tx = self.pool.begin().await?;
        let product =
            products::product_by_id(product_id, &mut tx).await?.ok_or(StoreApiError::ProductNotFound(product_id))?;
        let item = cart::upsert_item(user_id, &product, quantity, &mut tx).await?;
        tx.commit().await?;
        debug!("🛒️ Cart line for user {user_id}: {} x {}", item.quantity, product.name);
        Ok(item)
    }

    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let lines = cart::lines_for_user(user_id, &mut conn).await?;
        Ok(lines)
    }

    async fn clear_cart(&self, user_id: i64) -> Result<u64, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let removed = cart::clear_for_user(user_id, &mut conn).await?;
        debug!("🛒️ Removed {removed} cart lines for user {user_id}");
        Ok(removed)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::order_by_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::items_for_order(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::orders_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }
}
