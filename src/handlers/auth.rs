//! Cookie/status-code translation around the session service. The refresh
//! secret travels only in an HttpOnly cookie; the access token goes in the
//! response body for bearer use.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    errors::AppError,
    services::auth_service,
    state::AppState,
};

pub const REFRESH_COOKIE: &str = "refreshToken";

// Cookie lifetime tracks the stored record's expiry so the browser drops the
// secret no later than the server would reject it.
fn refresh_cookie(secret: String, expires: DateTime<Utc>) -> Cookie<'static> {
    let remaining = (expires - Utc::now()).num_seconds().max(0);
    Cookie::build((REFRESH_COOKIE, secret))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(remaining))
        .build()
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let ip = addr.ip().to_string();
    let tokens = auth_service::login(&state, &req.username, &req.password, Some(&ip)).await?;

    let jar = jar.add(refresh_cookie(tokens.refresh_token, tokens.refresh_expires));
    Ok((
        jar,
        Json(LoginResponse {
            access_token: tokens.access_token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let incoming = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let ip = addr.ip().to_string();
    let tokens = auth_service::refresh(&state, &incoming, Some(&ip)).await?;

    let jar = jar.add(refresh_cookie(tokens.refresh_token, tokens.refresh_expires));
    Ok((
        jar,
        Json(LoginResponse {
            access_token: tokens.access_token,
            token_type: "Bearer".to_string(),
        }),
    ))
}

pub async fn revoke(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    let incoming = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::Validation("missing refresh cookie".into()))?;

    let ip = addr.ip().to_string();
    auth_service::revoke(&state, &incoming, Some(&ip)).await?;

    let jar = jar.remove(Cookie::build(REFRESH_COOKIE).path("/").build());
    Ok((jar, StatusCode::NO_CONTENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn refresh_cookie_is_locked_down_and_expires_with_the_record() {
        let expires = Utc::now() + ChronoDuration::days(14);
        let cookie = refresh_cookie("secret".to_string(), expires);

        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));

        let max_age = cookie.max_age().unwrap();
        assert!(max_age <= time::Duration::days(14));
        assert!(max_age > time::Duration::days(14) - time::Duration::minutes(1));
    }

    #[test]
    fn refresh_cookie_never_carries_a_negative_lifetime() {
        let cookie = refresh_cookie("secret".to_string(), Utc::now() - ChronoDuration::hours(1));
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
