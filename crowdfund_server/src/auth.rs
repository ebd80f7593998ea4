//! Access token handling.
//!
//! Sessions are issued elsewhere; this server only validates the HS256 bearer tokens it is handed. [`TokenIssuer`]
//! exists so that tests and local tooling can mint tokens with the shared secret.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Duration;
use crowdfund_engine::db_types::Backer;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(24);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

impl JwtClaims {
    pub fn new<S: Into<String>>(user_id: i64, name: S, email: S) -> Self {
        Self { user_id, name: name.into(), email: email.into() }
    }

    pub fn backer(&self) -> Backer {
        Backer::new(self.user_id, self.name.as_str(), self.email.as_str())
    }
}

//-------------------------------------------------  TokenValidator  ---------------------------------------------------
#[derive(Clone)]
pub struct TokenValidator {
    key: Hs256Key,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: Hs256Key::new(config.jwt_secret.reveal().as_bytes()) }
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let token = Hs256
            .validator::<JwtClaims>(&self.key)
            .validate(&untrusted)
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        token
            .claims()
            .validate_expiration(&TimeOptions::default())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(token.claims().custom.clone())
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected 'Authorization: Bearer <token>'".into()))
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let validator = req.app_data::<web::Data<TokenValidator>>().ok_or_else(|| {
        error!("💻️ No token validator has been configured for this route");
        ServerError::ConfigurationError("Token validator is not configured".into())
    })?;
    let token = bearer_token(req)?;
    let claims = validator.validate(token).map_err(|e| {
        debug!("💻️ Rejected access token. {e}");
        e
    })?;
    trace!("💻️ Access token accepted for user #{}", claims.user_id);
    Ok(claims)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

//-------------------------------------------------  TokenIssuer  ------------------------------------------------------
pub struct TokenIssuer {
    key: Hs256Key,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: Hs256Key::new(config.jwt_secret.reveal().as_bytes()) }
    }

    /// Issue a new access token for the given claims. The claims are not checked against any user store.
    pub fn issue_token(&self, claims: JwtClaims, duration: Option<Duration>) -> Result<String, AuthError> {
        let header = Header::empty().with_token_type("JWT");
        let duration = duration.unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let claims = Claims::new(claims).set_duration_and_issuance(&TimeOptions::default(), duration);
        Hs256.token(&header, &claims, &self.key).map_err(|e| AuthError::ValidationError(format!("{e:?}")))
    }
}
