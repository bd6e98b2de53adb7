use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{CartItem, CartLine},
    traits::{CartManagement, CatalogManagement, StoreApiError},
};

/// The `CartApi` provides a unified API for reading and mutating per-user shopping carts.
pub struct CartApi<B> {
    db: B,
}

impl<B: Debug> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.db)
    }
}

impl<B> CartApi<B>
where B: CartManagement + CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Adds a product to the user's cart, or replaces the quantity if the product is already in it.
    /// The quantity must be a positive integer and the product must exist.
    pub async fn add_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, StoreApiError> {
        if quantity <= 0 {
            return Err(StoreApiError::InvalidQuantity(quantity));
        }
        trace!("🛒️ Adding {quantity} x product {product_id} to the cart of user {user_id}");
        self.db.upsert_cart_item(user_id, product_id, quantity).await
    }

    /// Fetches the user's cart, newest line first.
    pub async fn cart(&self, user_id: i64) -> Result<Vec<CartLine>, StoreApiError> {
        self.db.fetch_cart(user_id).await
    }

    /// Empties the user's cart and returns the number of lines removed.
    pub async fn clear(&self, user_id: i64) -> Result<u64, StoreApiError> {
        self.db.clear_cart(user_id).await
    }
}
