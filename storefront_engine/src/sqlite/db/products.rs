use log::{debug, trace};
use shop_common::Price;
use sqlx::SqliteConnection;

use crate::db_types::{NewProduct, Product};

pub async fn product_by_id(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    trace!("📦️ Fetching product [{product_id}]");
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let product = sqlx::query_as(
        "INSERT INTO products (name, description, price, stock) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.price)
    .bind(product.stock)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

pub async fn update_price(
    product_id: i64,
    new_price: Price,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as("UPDATE products SET price = $2 WHERE id = $1 RETURNING *")
        .bind(product_id)
        .bind(new_price)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

/// Atomically reserves `quantity` units of stock for the given product.
///
/// The decrement and the availability check happen in a single conditional `UPDATE`, so two
/// concurrent reservations can never both succeed on the same last unit. Returns `true` if the
/// stock was reserved, and `false` if the product had fewer than `quantity` units left.
pub async fn reserve_stock(product_id: i64, quantity: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE products SET stock = stock - $2 WHERE id = $1 AND stock >= $2")
        .bind(product_id)
        .bind(quantity)
        .execute(conn)
        .await?;
    let reserved = result.rows_affected() == 1;
    debug!("📦️ Reservation of {quantity} units of product {product_id}: {}", if reserved { "ok" } else { "refused" });
    Ok(reserved)
}
