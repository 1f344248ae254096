use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::dive::Dive;

#[derive(Debug, Deserialize)]
pub struct CreateDive {
    pub dive_site_id: i64,
    pub date: DateTime<Utc>,
    pub max_depth: i64,
    pub duration: i64,
}

pub type UpdateDive = CreateDive;

/// List view: joined with the site name.
#[derive(Debug, Serialize, FromRow)]
pub struct DiveSummary {
    pub id: i64,
    pub dive_site: String,
    pub date: DateTime<Utc>,
    pub max_depth: i64,
    pub duration: i64,
}

#[derive(Debug, Serialize)]
pub struct DiveDetails {
    pub id: i64,
    pub dive_site_id: i64,
    pub date: DateTime<Utc>,
    pub max_depth: i64,
    pub duration: i64,
}

impl From<Dive> for DiveDetails {
    fn from(d: Dive) -> Self {
        Self {
            id: d.id,
            dive_site_id: d.dive_site_id,
            date: d.date,
            max_depth: d.max_depth,
            duration: d.duration,
        }
    }
}
