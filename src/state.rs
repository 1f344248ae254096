use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::{config::Config, errors::AppError};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub cfg: Arc<Config>,
}

impl AppState {
    pub async fn new(cfg: &Config) -> Result<Self, AppError> {
        let opts = SqliteConnectOptions::from_str(&cfg.database_url)
            .map_err(|e| AppError::Db(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        sqlx::migrate!().run(&db).await?;

        Ok(Self {
            db,
            cfg: Arc::new(cfg.clone()),
        })
    }
}
