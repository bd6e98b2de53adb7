use mockall::mock;
use shop_common::Price;
use storefront_engine::{
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
};

mock! {
    pub ShopDb {}

    impl Clone for ShopDb {
        fn clone(&self) -> Self;
    }

    impl UserManagement for ShopDb {
        async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, StoreApiError>;
        async fn insert_user(&self, username: &str, is_staff: bool) -> Result<User, StoreApiError>;
    }

    impl CatalogManagement for ShopDb {
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StoreApiError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreApiError>;
        async fn update_product_price(&self, product_id: i64, new_price: Price) -> Result<Product, StoreApiError>;
    }

    impl CartManagement for ShopDb {
        async fn upsert_cart_item(&self, user_id: i64, product_id: i64, quantity: i64) -> Result<CartItem, StoreApiError>;
        async fn fetch_cart(&self, user_id: i64) -> Result<Vec<CartLine>, StoreApiError>;
        async fn clear_cart(&self, user_id: i64) -> Result<u64, StoreApiError>;
    }

    impl OrderManagement for ShopDb {
        async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, StoreApiError>;
        async fn fetch_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreApiError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreApiError>;
    }

    impl StorefrontDatabase for ShopDb {
        fn url(&self) -> &str;
        async fn place_order(&self, user_id: i64) -> Result<(Order, Vec<OrderItem>), OrderFlowError>;
        async fn update_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<OrderChanged, OrderFlowError>;
        async fn close(&mut self) -> Result<(), OrderFlowError>;
    }
}
