//! JWT access token issuing and verification.
//!
//! Access tokens are HMAC-SHA256 signed JWTs carrying the user id and an admin flag. Handlers
//! receive the validated claims by taking a [`JwtClaims`] parameter; the extractor reads the
//! `Authorization: Bearer` header and verifies it against the [`TokenVerifier`] in app data.
use std::{
    future::{ready, Ready},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The authenticated user's id.
    pub sub: i64,
    pub is_admin: bool,
    pub exp: u64,
}

/// Signs new access tokens. Token issuance (login) itself lives outside this service; the issuer
/// exists for tooling and tests, and to document the claim format.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    expiry: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { key, expiry: config.token_expiry }
    }

    pub fn issue_token(&self, user_id: i64, is_admin: bool) -> Result<String, AuthError> {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?
            .as_secs() +
            self.expiry.as_secs();
        let claims = JwtClaims { sub: user_id, is_admin, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }
}

/// Verifies access tokens. One instance is shared through app data.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { key }
    }

    pub fn decode(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<JwtClaims>(token, &self.key, &validation)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(data.claims)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header
        .to_str()
        .map_err(|e| AuthError::PoorlyFormattedToken(format!("Header is not valid UTF-8: {e}")))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token".to_string()))
}

fn extract_claims(req: &HttpRequest) -> Result<JwtClaims, AuthError> {
    let verifier = req
        .app_data::<web::Data<TokenVerifier>>()
        .ok_or_else(|| AuthError::ValidationError("Token verifier is not configured".to_string()))?;
    let token = bearer_token(req)?;
    let claims = verifier.decode(token)?;
    debug!("💻️ Access token validated for user {}", claims.sub);
    Ok(claims)
}

impl FromRequest for JwtClaims {
    type Error = crate::errors::ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_claims(req).map_err(Into::into))
    }
}
