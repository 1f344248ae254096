//! Background purge of expired refresh tokens. One task per process, spawned
//! from `main`; a failed sweep is logged and the loop keeps going.

use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::refresh_tokens;

/// Grace period so startup and migrations finish before the first sweep.
const STARTUP_DELAY: Duration = Duration::from_secs(5);

pub fn spawn(db: SqlitePool, interval: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(run(db, interval, shutdown))
}

async fn run(db: SqlitePool, interval: Duration, shutdown: CancellationToken) {
    tokio::select! {
        _ = shutdown.cancelled() => return,
        _ = tokio::time::sleep(STARTUP_DELAY) => {}
    }

    loop {
        match refresh_tokens::delete_expired(&db, Utc::now()).await {
            Ok(0) => {}
            Ok(n) => tracing::info!(count = n, "purged expired refresh tokens"),
            Err(e) => tracing::error!(error = %e, "refresh token purge failed"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
