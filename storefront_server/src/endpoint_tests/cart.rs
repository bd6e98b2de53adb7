use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use serde_json::json;
use shop_common::Price;
use storefront_engine::{
    db_types::{CartItem, CartLine},
    CartApi,
};

use super::{
    helpers::{get_request, issue_token, send_request},
    mocks::MockShopDb,
};
use crate::routes::{CartAddRoute, ClearCartRoute, MyCartRoute};

#[actix_web::test]
async fn adding_to_the_cart_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/cart").set_json(json!({"product_id": 3, "quantity": 2}));
    let (status, body) = send_request(req, "", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided."), "Unexpected body: {body}");
}

#[actix_web::test]
async fn adding_to_the_cart_returns_the_stored_line() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let req = TestRequest::post().uri("/cart").set_json(json!({"product_id": 3, "quantity": 2}));
    let (status, body) = send_request(req, &token, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"id":10,"user_id":7,"product_id":3,"unit_price":1250,"quantity":2,"total_price":2500,"created_at":"2024-05-01T12:00:00Z","updated_at":"2024-05-01T12:00:00Z"}"#
    );
}

#[actix_web::test]
async fn a_non_positive_quantity_is_rejected_without_touching_the_cart() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let req = TestRequest::post().uri("/cart").set_json(json!({"product_id": 3, "quantity": 0}));
    let (status, body) = send_request(req, &token, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Quantity must be a positive integer, not 0"}"#);
}

#[actix_web::test]
async fn the_cart_listing_includes_the_running_total() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let (status, body) = get_request(&token, "/cart", configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, CART_JSON);
}

#[actix_web::test]
async fn clearing_the_cart_reports_the_number_of_lines_removed() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let req = TestRequest::delete().uri("/cart");
    let (status, body) = send_request(req, &token, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Removed 2 cart items"}"#);
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockShopDb::new();
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    db.expect_upsert_cart_item().returning(move |user_id, product_id, quantity| {
        let unit_price = Price::from_cents(1250);
        Ok(CartItem {
            id: 10,
            user_id,
            product_id,
            unit_price,
            quantity,
            total_price: unit_price * quantity,
            created_at: ts,
            updated_at: ts,
        })
    });
    db.expect_fetch_cart().returning(|_| Ok(cart_response()));
    db.expect_clear_cart().returning(|_| Ok(2));
    let cart_api = CartApi::new(db);
    cfg.service(CartAddRoute::<MockShopDb>::new())
        .service(MyCartRoute::<MockShopDb>::new())
        .service(ClearCartRoute::<MockShopDb>::new())
        .app_data(web::Data::new(cart_api));
}

// Mock response to `fetch_cart`, newest line first
fn cart_response() -> Vec<CartLine> {
    vec![
        CartLine {
            id: 2,
            product_id: 3,
            product_name: "Coffee mug".to_string(),
            unit_price: Price::from_cents(1250),
            quantity: 2,
            total_price: Price::from_cents(2500),
        },
        CartLine {
            id: 1,
            product_id: 1,
            product_name: "Teapot".to_string(),
            unit_price: Price::from_cents(2000),
            quantity: 1,
            total_price: Price::from_cents(2000),
        },
    ]
}

const CART_JSON: &str = r#"{"items":[{"id":2,"product_id":3,"product_name":"Coffee mug","unit_price":1250,"quantity":2,"total_price":2500},{"id":1,"product_id":1,"product_name":"Teapot","unit_price":2000,"quantity":1,"total_price":2000}],"total":4500}"#;
