use shop_common::Price;

use crate::{
    db_types::{NewProduct, Product},
    traits::StoreApiError,
};

/// Manages the product catalogue. Stock mutation is deliberately absent here; the only code path
/// that decrements stock is the checkout transaction in
/// [`StorefrontDatabase::place_order`](super::StorefrontDatabase::place_order).
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches the product with the given id. If no product exists, `None` is returned.
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StoreApiError>;

    /// Stores a new product and returns the full record, including its assigned id.
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreApiError>;

    /// Changes the list price of a product. Existing cart lines and order items keep the price they
    /// were written with.
    async fn update_product_price(&self, product_id: i64, new_price: Price) -> Result<Product, StoreApiError>;
}
