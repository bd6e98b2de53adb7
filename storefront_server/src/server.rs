use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use futures::FutureExt;
use log::*;
use storefront_engine::{
    events::{EventHandlers, EventHooks, EventProducers, Notification, NotificationDispatcher, OrderStatusChangedEvent},
    AccountApi,
    CartApi,
    OrderFlowApi,
    SqliteDatabase,
};

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        CartAddRoute,
        ClearCartRoute,
        MyCartRoute,
        MyOrdersRoute,
        NotificationsRoute,
        PlaceOrderRoute,
        UpdateOrderStatusRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let dispatcher = NotificationDispatcher::new();
    let handlers = EventHandlers::new(config.event_buffer_size, notification_hooks(dispatcher.clone()));
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers, dispatcher)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Builds the hook set that turns committed order status changes into user notifications. The
/// publish happens on the event handler task, after the status transaction has committed.
pub fn notification_hooks(dispatcher: NotificationDispatcher) -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_status_changed(move |ev: OrderStatusChangedEvent| {
        let dispatcher = dispatcher.clone();
        async move {
            debug!("📬️ Order #{} moved from {} to {}", ev.order.id, ev.old_status, ev.new_status);
            let note = Notification::order_status_changed(ev.order.id, ev.old_status, ev.new_status);
            dispatcher.publish(ev.order.user_id, note);
        }
        .boxed()
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    dispatcher: NotificationDispatcher,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone(), producers.clone());
        let cart_api = CartApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let verifier = TokenVerifier::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("sfs::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(dispatcher.clone()));
        // Routes that require authentication
        let auth_scope = web::scope("/api")
            .service(CartAddRoute::<SqliteDatabase>::new())
            .service(MyCartRoute::<SqliteDatabase>::new())
            .service(ClearCartRoute::<SqliteDatabase>::new())
            .service(PlaceOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new());
        app.service(auth_scope).service(health).service(NotificationsRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
