//! Access control middleware for the storefront server.
//! This middleware can be placed on any route or service.
//!
//! It will check the incoming request for a valid JWT access token and then check the claims in the token
//! against the access level required for the route. If the token is valid and the user has the required
//! access, the request will be allowed to continue. Otherwise, a 401 or 403 response will be returned.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized},
    http::header,
    web,
    Error,
};
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::auth::TokenVerifier;

/// The access level a route demands from the token's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Any authenticated user.
    User,
    /// `is_admin` must be set in the claims.
    Admin,
}

pub struct AclMiddlewareFactory {
    level: AccessLevel,
}

impl AclMiddlewareFactory {
    pub fn new(level: AccessLevel) -> Self {
        AclMiddlewareFactory { level }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { level: self.level, service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    level: AccessLevel,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let level = self.level;
        Box::pin(async move {
            let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
                log::warn!("No token verifier found in app data");
                ErrorInternalServerError("No token verifier found in app data")
            })?;
            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| ErrorUnauthorized("No access token was provided."))?;
            let claims = verifier.decode(token).map_err(|e| ErrorUnauthorized(e.to_string()))?;
            if level == AccessLevel::Admin && !claims.is_admin {
                return Err(ErrorForbidden("Insufficient permissions"));
            }
            service.call(req).await
        })
    }
}
