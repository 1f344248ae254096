use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Dive {
    pub id: i64,
    pub dive_site_id: i64,
    pub date: DateTime<Utc>,
    /// Minutes.
    pub duration: i64,
    /// Meters, 1..=500.
    pub max_depth: i64,
}
