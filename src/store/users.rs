use sqlx::sqlite::Sqlite;
use sqlx::Executor;

use crate::models::user::User;

pub async fn find_by_username<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    // case-sensitive exact match
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn update_password_hash<'e>(
    db: impl Executor<'e, Database = Sqlite>,
    id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
