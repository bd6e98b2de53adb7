use thiserror::Error;

/// The error type shared by the query-side traits ([`super::UserManagement`],
/// [`super::CatalogManagement`], [`super::CartManagement`] and [`super::OrderManagement`]).
#[derive(Debug, Clone, Error)]
pub enum StoreApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The requested user {0} does not exist")]
    UserNotFound(i64),
    #[error("The requested product {0} does not exist")]
    ProductNotFound(i64),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Quantity must be a positive integer, not {0}")]
    InvalidQuantity(i64),
}

impl From<sqlx::Error> for StoreApiError {
    fn from(e: sqlx::Error) -> Self {
        StoreApiError::DatabaseError(e.to_string())
    }
}
