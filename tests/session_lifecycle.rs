//! End-to-end session lifecycle against the seeded database, through the
//! public service API.

use std::sync::Arc;

use chrono::Utc;
use diving_api::{
    auth::tokens::sha256_hex,
    config::Config,
    errors::AppError,
    services::auth_service,
    state::AppState,
    store::refresh_tokens,
};
use sqlx::sqlite::SqlitePoolOptions;

async fn test_state() -> AppState {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&db).await.unwrap();

    AppState {
        db,
        cfg: Arc::new(Config {
            database_url: "sqlite::memory:".into(),
            jwt_secret: "integration-secret".into(),
            jwt_issuer: "diving-api".into(),
            jwt_audience: "diving-api".into(),
            max_active_refresh_tokens: 5,
            cleanup_interval: std::time::Duration::from_secs(3600),
        }),
    }
}

#[tokio::test]
async fn seeded_user_full_lifecycle() {
    let state = test_state().await;

    // seeded testUser carries a plaintext password that gets upgraded here
    let issued = auth_service::login(&state, "testUser", "Password123!", Some("127.0.0.1"))
        .await
        .unwrap();
    assert!(!issued.access_token.is_empty());

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'testUser'")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert!(stored.starts_with("$argon2"));

    // rotate a few times; each step yields exactly one active record
    let mut current = issued.refresh_token;
    for _ in 0..3 {
        let next = auth_service::refresh(&state, &current, Some("127.0.0.1"))
            .await
            .unwrap();
        assert_ne!(next.refresh_token, current);
        current = next.refresh_token;
    }

    let active = refresh_tokens::active_for_user(&state.db, 1, Utc::now())
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].token_hash, sha256_hex(&current));

    // explicit revoke ends the session; the cookie value is then unknown-but-found
    auth_service::revoke(&state, &current, Some("127.0.0.1"))
        .await
        .unwrap();
    assert!(matches!(
        auth_service::refresh(&state, &current, None).await,
        Err(AppError::Unauthorized)
    ));
}

#[tokio::test]
async fn replaying_an_old_link_of_the_chain_kills_the_session() {
    let state = test_state().await;

    let a = auth_service::login(&state, "adminUser", "ChangeMe123!", None)
        .await
        .unwrap();
    let b = auth_service::refresh(&state, &a.refresh_token, None)
        .await
        .unwrap();

    // stolen (or double-submitted) old secret
    assert!(matches!(
        auth_service::refresh(&state, &a.refresh_token, None).await,
        Err(AppError::Unauthorized)
    ));

    // the whole chain is dead, including the fresh end
    assert!(matches!(
        auth_service::refresh(&state, &b.refresh_token, None).await,
        Err(AppError::Unauthorized)
    ));

    let active = refresh_tokens::active_for_user(&state.db, 2, Utc::now())
        .await
        .unwrap();
    assert!(active.is_empty());
}
