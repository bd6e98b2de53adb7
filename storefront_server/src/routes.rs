//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don't block
//! execution.
use std::convert::Infallible;

use actix_web::{get, http::header, web, HttpResponse, Responder};
use futures::StreamExt;
use log::*;
use storefront_engine::{
    events::NotificationDispatcher,
    AccountApi,
    CartApi,
    OrderFlowApi,
    StorefrontDatabase,
};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::{
    auth::JwtClaims,
    data_objects::{CartAddRequest, CartContents, JsonResponse, OrderPlacedResult, StatusChangedResult, UpdateStatusRequest},
    errors::ServerError,
};

// Actix-web cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires $level:expr)  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new($level));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Cart  ----------------------------------------------------

route!(cart_add => Post "/cart" impl StorefrontDatabase);
/// Route handler for adding a product to the authenticated user's cart.
///
/// If the product is already in the cart, the quantity is replaced. The product's current price is
/// captured into the cart line at this point and sticks until checkout.
pub async fn cart_add<B: StorefrontDatabase + 'static>(
    claims: JwtClaims,
    body: web::Json<CartAddRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let CartAddRequest { product_id, quantity } = body.into_inner();
    debug!("💻️ POST cart for user {}: {quantity} x product {product_id}", claims.sub);
    let line = api.add_item(claims.sub, product_id, quantity).await?;
    Ok(HttpResponse::Ok().json(line))
}

route!(my_cart => Get "/cart" impl StorefrontDatabase);
/// Route handler for fetching the authenticated user's cart. The user id is extracted from the JWT
/// access token supplied in the `Authorization` header.
pub async fn my_cart<B: StorefrontDatabase + 'static>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET cart for user {}", claims.sub);
    let items = api.cart(claims.sub).await?;
    Ok(HttpResponse::Ok().json(CartContents::new(items)))
}

route!(clear_cart => Delete "/cart" impl StorefrontDatabase);
pub async fn clear_cart<B: StorefrontDatabase + 'static>(
    claims: JwtClaims,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ DELETE cart for user {}", claims.sub);
    let removed = api.clear(claims.sub).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Removed {removed} cart items"))))
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(place_order => Post "/order" impl StorefrontDatabase);
/// Route handler for the checkout endpoint.
///
/// Converts the authenticated user's cart into a new `Pending` order in a single atomic
/// transaction. An empty cart or a line that cannot be covered by stock aborts the whole checkout
/// with a 400 response and leaves everything untouched.
pub async fn place_order<B: StorefrontDatabase + 'static>(
    claims: JwtClaims,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST order for user {}", claims.sub);
    let (order, _items) = api.place_order(claims.sub).await?;
    Ok(HttpResponse::Created().json(OrderPlacedResult { order_id: order.id, total_amount: order.total_amount }))
}

route!(my_orders => Get "/orders" impl StorefrontDatabase);
/// Route handler for the orders endpoint.
///
/// Authenticated users can fetch their own orders using this endpoint. The user id is extracted
/// from the JWT access token supplied in the `Authorization` header.
pub async fn my_orders<B: StorefrontDatabase + 'static>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for user {}", claims.sub);
    let history = api.order_history(claims.sub).await?;
    Ok(HttpResponse::Ok().json(history))
}

route!(update_order_status => Patch "/order/{id}/status" impl StorefrontDatabase where requires crate::middleware::AccessLevel::Admin);
/// Route handler for the order status endpoint.
///
/// Admin users move orders through their lifecycle here. Illegal transitions are rejected with a
/// 400 response and the stored state is untouched. A committed change fires the order status event
/// hook, which feeds the per-user notification stream.
pub async fn update_order_status<B: StorefrontDatabase + 'static>(
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ PATCH order {order_id} status to {status}");
    let changed = api.update_order_status(order_id, status).await?;
    let result = StatusChangedResult {
        order_id: changed.order.id,
        old_status: changed.old_status,
        new_status: changed.new_status,
    };
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Notifications  ----------------------------------------------------

route!(notifications => Get "/notifications/{user_id}" impl StorefrontDatabase);
/// Route handler for the notification stream.
///
/// Opens a server-sent events stream carrying the given user's order notifications. The user must
/// exist; beyond that, no authentication is required to listen. Messages published while nobody is
/// connected are dropped, not queued.
pub async fn notifications<B: StorefrontDatabase + 'static>(
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
    dispatcher: web::Data<NotificationDispatcher>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    if !api.user_exists(user_id).await? {
        debug!("💻️ Rejecting notification subscription for unknown user {user_id}");
        return Err(ServerError::NoRecordFound(format!("User {user_id}")));
    }
    info!("💻️ User {user_id} subscribed to notifications");
    let rx = dispatcher.subscribe(user_id);
    let stream = BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(notification) => match serde_json::to_string(&notification) {
                Ok(json) => Some(Ok::<_, Infallible>(web::Bytes::from(format!("data: {json}\n\n")))),
                Err(e) => {
                    error!("💻️ Could not serialize notification: {e}");
                    None
                },
            },
            Err(BroadcastStreamRecvError::Lagged(missed)) => {
                warn!("💻️ Notification subscriber lagged; {missed} messages dropped");
                None
            },
        }
    });
    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream))
}
