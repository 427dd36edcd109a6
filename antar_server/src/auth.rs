//! JWT access-token authentication.
//!
//! The identity service (external to this repo) registers users and issues HS256-signed access tokens carrying the
//! verified user id. This module validates the `Authorization: Bearer <jwt>` header and hands the claims to any
//! handler that declares a [`JwtClaims`] parameter. Handlers never see an unauthenticated user id.
use std::{
    future::{ready, Ready},
    time::Duration,
};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use antar_engine::db_types::UserId;
use chrono::Utc;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt, Claims, Header, TimeOptions, Token, UntrustedToken,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::ServerError};

pub const USER_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The authenticated user. Opaque 128-bit id assigned by the identity service.
    pub sub: UserId,
    pub role: String,
}

impl JwtClaims {
    pub fn user(sub: UserId) -> Self {
        Self { sub, role: USER_ROLE.to_string() }
    }
}

//--------------------------------------   TokenVerifier   -----------------------------------------------------------
pub struct TokenVerifier {
    key: Hs256Key,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: Hs256Key::new(config.jwt_secret.reveal().as_bytes()) }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, ServerError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| {
            debug!("🔐️ Poorly formatted access token. {e}");
            ServerError::Unauthorized
        })?;
        let token: Token<JwtClaims> = Hs256.validator(&self.key).validate(&untrusted).map_err(|e| {
            debug!("🔐️ Access token failed validation. {e}");
            ServerError::Unauthorized
        })?;
        token.claims().validate_expiration(&TimeOptions::default()).map_err(|e| {
            debug!("🔐️ Access token expired. {e}");
            ServerError::Unauthorized
        })?;
        let claims = token.claims().custom.clone();
        if claims.role != USER_ROLE {
            debug!("🔐️ Token for {} carries role {}, which cannot use the user endpoints", claims.sub, claims.role);
            return Err(ServerError::Unauthorized);
        }
        Ok(claims)
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let verifier = req
        .app_data::<web::Data<TokenVerifier>>()
        .ok_or_else(|| ServerError::Internal("TokenVerifier is not configured".to_string()))?;
    let header = req.headers().get(header::AUTHORIZATION).ok_or(ServerError::Unauthorized)?;
    let value = header.to_str().map_err(|_| ServerError::Unauthorized)?;
    let token = value.strip_prefix("Bearer ").ok_or(ServerError::Unauthorized)?;
    verifier.verify(token)
}

//--------------------------------------    TokenIssuer    -----------------------------------------------------------
/// Issues access tokens. In production this lives in the identity service; the server keeps it for operator tooling
/// and tests, signing with the same shared secret.
pub struct TokenIssuer {
    key: Hs256Key,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: Hs256Key::new(config.jwt_secret.reveal().as_bytes()) }
    }

    pub fn issue_token(&self, claims: JwtClaims, duration: Option<Duration>) -> Result<String, ServerError> {
        let header = Header::empty().with_token_type("JWT");
        let duration = duration.unwrap_or_else(|| Duration::from_secs(60 * 60 * 24));
        let mut claims = Claims::new(claims);
        claims.expiration = Some(Utc::now() + chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::hours(24)));
        Hs256.token(&header, &claims, &self.key).map_err(|e| ServerError::Internal(format!("{e}")))
    }
}
