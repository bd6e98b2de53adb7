use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{CartItem, CartLine, Product};

/// Writes a cart line for `user_id` and `product`, replacing the quantity if the line already
/// exists. The product's current price is snapshotted into `unit_price`, and `total_price` is
/// recomputed from it.
pub async fn upsert_item(
    user_id: i64,
    product: &Product,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<CartItem, sqlx::Error> {
    let total = product.price * quantity;
    let item = sqlx::query_as(
        r#"INSERT INTO cart_items (user_id, product_id, unit_price, quantity, total_price)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, product_id) DO UPDATE SET
            unit_price = excluded.unit_price,
            quantity = excluded.quantity,
            total_price = excluded.total_price,
            updated_at = CURRENT_TIMESTAMP
        RETURNING *"#,
    )
    .bind(user_id)
    .bind(product.id)
    .bind(product.price)
    .bind(quantity)
    .bind(total)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn items_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, sqlx::Error> {
    trace!("🛒️ Fetching cart rows for user [{user_id}]");
    let items = sqlx::query_as("SELECT * FROM cart_items WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// The cart as presented to clients, with product names joined in.
pub async fn lines_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartLine>, sqlx::Error> {
    let lines = sqlx::query_as(
        r#"SELECT
            cart_items.id AS id,
            cart_items.product_id AS product_id,
            products.name AS product_name,
            cart_items.unit_price AS unit_price,
            cart_items.quantity AS quantity,
            cart_items.total_price AS total_price
        FROM cart_items INNER JOIN products ON cart_items.product_id = products.id
        WHERE cart_items.user_id = $1
        ORDER BY cart_items.id DESC"#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(lines)
}

/// Deletes the user's cart and returns the number of lines removed.
pub async fn clear_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1").bind(user_id).execute(conn).await?;
    Ok(result.rows_affected())
}
