use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use serde_json::json;
use shop_common::Price;
use storefront_engine::{
    db_types::{Order, OrderChanged, OrderItem, OrderStatus},
    events::EventProducers,
    traits::OrderFlowError,
    transitions::InvalidTransition,
    AccountApi,
    OrderFlowApi,
};

use super::{
    helpers::{get_request, issue_token, send_request},
    mocks::MockShopDb,
};
use crate::routes::{MyOrdersRoute, PlaceOrderRoute, UpdateOrderStatusRoute};

//----------------------------------------------   Checkout  ----------------------------------------------------

#[actix_web::test]
async fn checkout_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/order");
    let (status, body) = send_request(req, "", configure_checkout).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided."), "Unexpected body: {body}");
}

#[actix_web::test]
async fn checkout_returns_the_new_order_id_and_total() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let req = TestRequest::post().uri("/order");
    let (status, body) = send_request(req, &token, configure_checkout).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, r#"{"order_id":11,"total_amount":2000}"#);
}

#[actix_web::test]
async fn checking_out_an_empty_cart_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(8, false);
    let req = TestRequest::post().uri("/order");
    let (status, body) = send_request(req, &token, configure_checkout).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Cannot place an order from an empty cart"}"#);
}

#[actix_web::test]
async fn insufficient_stock_aborts_the_checkout() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(9, false);
    let req = TestRequest::post().uri("/order");
    let (status, body) = send_request(req, &token, configure_checkout).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Insufficient stock for Coffee mug: 1 available, 2 requested"}"#);
}

//----------------------------------------------   Order history  ------------------------------------------------

#[actix_web::test]
async fn my_orders_returns_the_full_history() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let (status, body) = get_request(&token, "/orders", configure_history).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, HISTORY_JSON);
}

//----------------------------------------------   Status updates  -----------------------------------------------

#[actix_web::test]
async fn status_updates_require_a_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::patch().uri("/order/11/status").set_json(json!({"status": "Shipped"}));
    let (status, body) = send_request(req, "", configure_status).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided."), "Unexpected body: {body}");
}

#[actix_web::test]
async fn normal_users_may_not_update_order_statuses() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, false);
    let req = TestRequest::patch().uri("/order/11/status").set_json(json!({"status": "Shipped"}));
    let (status, body) = send_request(req, &token, configure_status).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient permissions"), "Unexpected body: {body}");
}

#[actix_web::test]
async fn admins_can_move_an_order_through_its_lifecycle() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1, true);
    let req = TestRequest::patch().uri("/order/11/status").set_json(json!({"status": "Shipped"}));
    let (status, body) = send_request(req, &token, configure_status).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"order_id":11,"old_status":"Pending","new_status":"Shipped"}"#);
}

#[actix_web::test]
async fn illegal_transitions_are_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1, true);
    let req = TestRequest::patch().uri("/order/12/status").set_json(json!({"status": "Shipped"}));
    let (status, body) = send_request(req, &token, configure_status).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid status transition from Delivered to Shipped"}"#);
}

#[actix_web::test]
async fn updating_a_missing_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1, true);
    let req = TestRequest::patch().uri("/order/99/status").set_json(json!({"status": "Shipped"}));
    let (status, body) = send_request(req, &token, configure_status).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The requested order 99 does not exist"}"#);
}

//----------------------------------------------   Fixtures  -----------------------------------------------------

fn configure_checkout(cfg: &mut ServiceConfig) {
    let mut db = MockShopDb::new();
    db.expect_place_order().returning(|user_id| match user_id {
        7 => Ok((pending_order(11, 7, 2000), vec![order_item(21, 11)])),
        8 => Err(OrderFlowError::EmptyCart),
        _ => Err(OrderFlowError::InsufficientStock {
            product_name: "Coffee mug".to_string(),
            available: 1,
            requested: 2,
        }),
    });
    let orders_api = OrderFlowApi::new(db, EventProducers::default());
    cfg.service(PlaceOrderRoute::<MockShopDb>::new()).app_data(web::Data::new(orders_api));
}

fn configure_history(cfg: &mut ServiceConfig) {
    let mut db = MockShopDb::new();
    db.expect_fetch_orders_for_user()
        .returning(|user_id| Ok(vec![pending_order(12, user_id, 1500), delivered_order(11, user_id, 2000)]));
    db.expect_fetch_order_items().returning(|order_id| Ok(vec![order_item(order_id + 10, order_id)]));
    let accounts_api = AccountApi::new(db);
    cfg.service(MyOrdersRoute::<MockShopDb>::new()).app_data(web::Data::new(accounts_api));
}

fn configure_status(cfg: &mut ServiceConfig) {
    let mut db = MockShopDb::new();
    db.expect_update_order_status().returning(|order_id, new_status| match order_id {
        11 => {
            let mut order = pending_order(11, 7, 2000);
            order.status = new_status;
            Ok(OrderChanged { order, old_status: OrderStatus::Pending, new_status })
        },
        12 => Err(OrderFlowError::InvalidTransition(InvalidTransition {
            from: OrderStatus::Delivered,
            to: new_status,
        })),
        id => Err(OrderFlowError::OrderNotFound(id)),
    });
    let orders_api = OrderFlowApi::new(db, EventProducers::default());
    cfg.service(UpdateOrderStatusRoute::<MockShopDb>::new()).app_data(web::Data::new(orders_api));
}

fn pending_order(id: i64, user_id: i64, total_cents: i64) -> Order {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Order {
        id,
        user_id,
        total_amount: Price::from_cents(total_cents),
        status: OrderStatus::Pending,
        created_at: ts,
        updated_at: ts,
    }
}

fn delivered_order(id: i64, user_id: i64, total_cents: i64) -> Order {
    Order { status: OrderStatus::Delivered, ..pending_order(id, user_id, total_cents) }
}

fn order_item(id: i64, order_id: i64) -> OrderItem {
    OrderItem { id, order_id, product_id: 3, quantity: 2, price: Price::from_cents(1000) }
}

const HISTORY_JSON: &str = r#"{"user_id":7,"total_orders":3500,"orders":[{"id":12,"user_id":7,"total_amount":1500,"status":"Pending","created_at":"2024-05-01T12:00:00Z","updated_at":"2024-05-01T12:00:00Z","items":[{"id":22,"order_id":12,"product_id":3,"quantity":2,"price":1000}]},{"id":11,"user_id":7,"total_amount":2000,"status":"Delivered","created_at":"2024-05-01T12:00:00Z","updated_at":"2024-05-01T12:00:00Z","items":[{"id":21,"order_id":11,"product_id":3,"quantity":2,"price":1000}]}]}"#;
