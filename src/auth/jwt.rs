use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::AppError, models::user::User, state::AppState};

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn new_access_claims(cfg: &Config, user: &User) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.clone(),
        iss: cfg.jwt_issuer.clone(),
        aud: cfg.jwt_audience.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)).timestamp() as usize,
    }
}

pub fn make_token(cfg: &Config, claims: &Claims) -> Result<String, AppError> {
    let key = EncodingKey::from_secret(cfg.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &key).map_err(|_| AppError::Jwt)
}

pub fn decode_token(cfg: &Config, token: &str) -> Result<TokenData<Claims>, AppError> {
    let key = DecodingKey::from_secret(cfg.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.set_issuer(&[&cfg.jwt_issuer]);
    validation.set_audience(&[&cfg.jwt_audience]);
    decode::<Claims>(token, &key, &validation).map_err(|_| AppError::Jwt)
}

/// Bearer-token extractor for protected routes.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let data = decode_token(&state.cfg, bearer.token())?;
        Ok(Self(data.claims))
    }
}
