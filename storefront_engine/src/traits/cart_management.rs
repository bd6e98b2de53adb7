use crate::{
    db_types::{CartItem, CartLine},
    traits::StoreApiError,
};

/// Manages per-user cart rows. A cart is the set of rows belonging to one user; there is no
/// separate cart record. Every mutation recomputes the line total from the stored unit price.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Adds a product to the user's cart, or replaces the quantity if the product is already there.
    /// The product's current price is captured into the line when it is written.
    ///
    /// The product must exist and `quantity` must be positive.
    async fn upsert_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, StoreApiError>;

    /// Fetches the user's cart, newest line first, with product names attached.
    async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, StoreApiError>;

    /// Deletes every line in the user's cart and returns the number of lines removed.
    async fn clear_cart(&self, user_id: i64) -> Result<u64, StoreApiError>;
}
