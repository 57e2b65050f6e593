use std::future::{ready, Ready};

use actix_web::{http::header, web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// The claims carried in every access token. `sub` is the login of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and validates HS256 access tokens. One instance is shared with every handler via
/// `web::Data`, which is also how the [`JwtClaims`] extractor finds it.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry: config.token_expiry,
        }
    }

    /// Issue a new access token for `login`.
    ///
    /// This method DOES NOT verify any credentials. That must be done prior to calling
    /// `issue_token`.
    pub fn issue_token(&self, login: &str) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let exp = iat + self.expiry.num_seconds();
        let claims = JwtClaims { sub: login.to_string(), iat, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::CouldNotSerializeToken(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

/// Pulls the access token out of the `Authorization` header ("Bearer " prefix optional) and
/// validates it against the shared [`TokenIssuer`].
fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::InitializeError("TokenIssuer is not configured".to_string()))?;
    let header = req.headers().get(header::AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let raw = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
    let claims = issuer.validate_token(token).map_err(|e| {
        debug!("🔑️ Rejected access token. {e}");
        e
    })?;
    Ok(claims)
}
