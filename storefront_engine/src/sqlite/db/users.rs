use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::User;

pub async fn user_by_id(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    trace!("🧑️ Fetching user [{user_id}]");
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn insert_user(username: &str, is_staff: bool, conn: &mut SqliteConnection) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as("INSERT INTO users (username, is_staff) VALUES ($1, $2) RETURNING *")
        .bind(username)
        .bind(is_staff)
        .fetch_one(conn)
        .await?;
    Ok(user)
}
