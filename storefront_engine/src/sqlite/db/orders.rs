use log::trace;
use shop_common::Price;
use sqlx::SqliteConnection;

use crate::db_types::{Order, OrderItem, OrderStatus};

/// Creates a new `Pending` order with a zero total. The caller fills in line items and the final
/// total inside the same transaction.
pub async fn insert_order(user_id: i64, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as("INSERT INTO orders (user_id, total_amount, status) VALUES ($1, 0, $2) RETURNING *")
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .fetch_one(conn)
        .await?;
    Ok(order)
}

pub async fn insert_order_item(
    order_id: i64,
    product_id: i64,
    quantity: i64,
    price: Price,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    let item = sqlx::query_as(
        "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(order_id)
    .bind(product_id)
    .bind(quantity)
    .bind(price)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn set_total_amount(order_id: i64, total: Price, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order = sqlx::query_as(
        "UPDATE orders SET total_amount = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *",
    )
    .bind(order_id)
    .bind(total)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

pub async fn order_by_id(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    trace!("📋️ Fetching order [{order_id}]");
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Moves an order from `old_status` to `new_status` in one guarded statement. If the stored status
/// no longer matches `old_status` (a concurrent update won the race), no row matches and `None` is
/// returned.
pub async fn update_status_guarded(
    order_id: i64,
    old_status: OrderStatus,
    new_status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        "UPDATE orders SET status = $3, updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND status = $2 RETURNING *",
    )
    .bind(order_id)
    .bind(old_status)
    .bind(new_status)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
