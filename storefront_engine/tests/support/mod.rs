pub mod prepare_env;

use shop_common::Price;
use storefront_engine::{
    db_types::{NewProduct, Product, User},
    CatalogManagement,
    SqliteDatabase,
    UserManagement,
};

use crate::support::prepare_env::{prepare_test_env, random_db_path};

pub async fn new_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn seed_user(db: &SqliteDatabase, username: &str) -> User {
    db.insert_user(username, false).await.expect("Error creating user")
}

pub async fn seed_product(db: &SqliteDatabase, name: &str, price_units: i64, stock: i64) -> Product {
    let product = NewProduct::new(name, Price::from_units(price_units), stock);
    db.insert_product(product).await.expect("Error creating product")
}
