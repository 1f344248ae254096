//! Refresh token persistence. Every function takes an executor so the same
//! queries run against the pool or inside the rotation transaction. All
//! mutations are row-scoped; nothing here locks whole tables, so the
//! housekeeping sweeper commutes with concurrent revokes and inserts.

use chrono::{DateTime, Utc};
use sqlx::sqlite::Sqlite;
use sqlx::Executor;

use crate::models::refresh_token::RefreshToken;

pub struct NewRefreshToken<'a> {
    pub user_id: i64,
    pub token_hash: &'a str,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    pub created_by_ip: Option<&'a str>,
}

pub async fn insert<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    t: &NewRefreshToken<'_>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, token_hash, created, expires, created_by_ip)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(t.user_id)
    .bind(t.token_hash)
    .bind(t.created)
    .bind(t.expires)
    .bind(t.created_by_ip)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_hash<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    token_hash: &str,
) -> Result<Option<RefreshToken>, sqlx::Error> {
    sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .fetch_optional(db)
        .await
}

/// Active records for a user, newest first. Cap enforcement keeps the head of
/// this list and revokes the tail.
pub async fn active_for_user<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<RefreshToken>, sqlx::Error> {
    sqlx::query_as::<_, RefreshToken>(
        r#"
        SELECT * FROM refresh_tokens
        WHERE user_id = ? AND revoked IS NULL AND expires > ?
        ORDER BY created DESC
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_all(db)
    .await
}

/// Set `revoked` on a single record. Guarded on `revoked IS NULL` so a repeat
/// revoke never moves the original timestamp.
pub async fn revoke<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    id: i64,
    now: DateTime<Utc>,
    revoked_by_ip: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked = ?, revoked_by_ip = ? WHERE id = ? AND revoked IS NULL",
    )
    .bind(now)
    .bind(revoked_by_ip)
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

/// Rotation: revoke the presented record and point it at its successor.
pub async fn revoke_replaced<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    id: i64,
    now: DateTime<Utc>,
    revoked_by_ip: Option<&str>,
    replaced_by_token_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = ?, revoked_by_ip = ?, replaced_by_token_hash = ?
        WHERE id = ? AND revoked IS NULL
        "#,
    )
    .bind(now)
    .bind(revoked_by_ip)
    .bind(replaced_by_token_hash)
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

/// Mass invalidation after token reuse is detected.
pub async fn revoke_all_active_for_user<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    user_id: i64,
    now: DateTime<Utc>,
    revoked_by_ip: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked = ?, revoked_by_ip = ?
        WHERE user_id = ? AND revoked IS NULL AND expires > ?
        "#,
    )
    .bind(now)
    .bind(revoked_by_ip)
    .bind(user_id)
    .bind(now)
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}

/// Housekeeping: drop every record past its expiry, revoked or not.
pub async fn delete_expired<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires <= ?")
        .bind(now)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

/// Opportunistic login-time purge, scoped to one user.
pub async fn delete_expired_for_user<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ? AND expires <= ?")
        .bind(user_id)
        .bind(now)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    async fn seed(pool: &SqlitePool, hash: &str, expires: DateTime<Utc>) -> i64 {
        insert(
            pool,
            &NewRefreshToken {
                user_id: 1,
                token_hash: hash,
                created: Utc::now() - Duration::days(1),
                expires,
                created_by_ip: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn delete_expired_ignores_live_records() {
        let pool = test_pool().await;
        let now = Utc::now();

        seed(&pool, "expired-plain", now - Duration::hours(1)).await;
        let expired_revoked = seed(&pool, "expired-revoked", now - Duration::hours(2)).await;
        revoke(&pool, expired_revoked, now - Duration::hours(3), None)
            .await
            .unwrap();
        let live = seed(&pool, "live", now + Duration::days(7)).await;
        let live_revoked = seed(&pool, "live-revoked", now + Duration::days(7)).await;
        revoke(&pool, live_revoked, now, None).await.unwrap();

        // expired rows go regardless of revocation state
        assert_eq!(delete_expired(&pool, now).await.unwrap(), 2);

        assert!(find_by_hash(&pool, "expired-plain").await.unwrap().is_none());
        assert!(find_by_hash(&pool, "expired-revoked")
            .await
            .unwrap()
            .is_none());
        // unexpired rows survive, revoked or not
        assert!(find_by_hash(&pool, "live").await.unwrap().is_some());
        assert!(find_by_hash(&pool, "live-revoked").await.unwrap().is_some());

        let active = active_for_user(&pool, 1, now).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, live);
    }

    #[tokio::test]
    async fn repeat_revoke_does_not_touch_the_row() {
        let pool = test_pool().await;
        let now = Utc::now();
        let id = seed(&pool, "h", now + Duration::days(1)).await;

        assert_eq!(revoke(&pool, id, now, Some("1.2.3.4")).await.unwrap(), 1);
        let first = find_by_hash(&pool, "h").await.unwrap().unwrap().revoked;

        assert_eq!(
            revoke(&pool, id, now + Duration::hours(1), Some("5.6.7.8"))
                .await
                .unwrap(),
            0
        );
        let rec = find_by_hash(&pool, "h").await.unwrap().unwrap();
        assert_eq!(rec.revoked, first);
        assert_eq!(rec.revoked_by_ip.as_deref(), Some("1.2.3.4"));
    }
}
