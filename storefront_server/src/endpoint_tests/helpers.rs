use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use shop_common::Secret;

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("an-endpoint-test-only-secret-0123456789abcdef".to_string()),
        token_expiry: Duration::from_secs(3600),
    }
}

pub fn issue_token(user_id: i64, is_admin: bool) -> String {
    let issuer = TokenIssuer::new(&get_auth_config());
    issuer.issue_token(user_id, is_admin).expect("Failed to sign token")
}

/// Sends the request against a test service built from `configure`, attaching the token as a
/// `Bearer` header if one is given. Errors that escape the handlers (extractors, middleware) are
/// rendered to responses so every test sees a status code and a body.
pub async fn send_request(req: TestRequest, token: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let mut req = req;
    if !token.is_empty() {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    let verifier = TokenVerifier::new(&get_auth_config());
    let app = App::new().app_data(web::Data::new(verifier)).configure(configure);
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = actix_web::HttpResponse::from_error(e);
            let status = res.status();
            let body = actix_web::body::to_bytes(res.into_body()).await.unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub async fn get_request(token: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    send_request(TestRequest::get().uri(path), token, configure).await
}
