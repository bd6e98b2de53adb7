use actix_web::{
    body::MessageBody,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{TimeZone, Utc};
use storefront_engine::{
    db_types::User,
    events::{Notification, NotificationDispatcher},
    AccountApi,
};

use super::{helpers::get_request, mocks::MockShopDb};
use crate::routes::NotificationsRoute;

#[actix_web::test]
async fn unknown_users_cannot_subscribe() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/notifications/99", configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. User 99"}"#);
}

#[actix_web::test]
async fn subscribers_receive_status_change_frames() {
    let _ = env_logger::try_init().ok();
    let dispatcher = NotificationDispatcher::new();
    let app = App::new()
        .app_data(web::Data::new(AccountApi::new(known_users())))
        .app_data(web::Data::new(dispatcher.clone()))
        .service(NotificationsRoute::<MockShopDb>::new());
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri("/notifications/7").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "text/event-stream");
    assert_eq!(res.headers().get(header::CACHE_CONTROL).unwrap(), "no-cache");
    // The subscription is live once the response headers are out, so a message published now must
    // arrive as the first frame on the body stream.
    dispatcher.publish(7, Notification::order_status_changed(11, "Pending", "Shipped"));
    let (_, res) = res.into_parts();
    let mut body = res.into_body();
    let frame = futures::future::poll_fn(|cx| std::pin::Pin::new(&mut body).poll_next(cx))
        .await
        .unwrap()
        .unwrap();
    let frame = String::from_utf8_lossy(&frame).into_owned();
    assert_eq!(
        frame,
        "data: {\"type\":\"notification\",\"message\":\"Your order #11 status changed from Pending to Shipped.\"}\n\n"
    );
}

fn configure(cfg: &mut ServiceConfig) {
    cfg.service(NotificationsRoute::<MockShopDb>::new())
        .app_data(web::Data::new(AccountApi::new(known_users())))
        .app_data(web::Data::new(NotificationDispatcher::new()));
}

// Only user 7 exists.
fn known_users() -> MockShopDb {
    let mut db = MockShopDb::new();
    db.expect_fetch_user().returning(|user_id| {
        Ok((user_id == 7).then(|| User {
            id: 7,
            username: "alice".to_string(),
            is_staff: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }))
    });
    db
}
