use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::dive_site::DiveSite;

#[derive(Debug, Deserialize)]
pub struct CreateDiveSite {
    pub name: String,
    pub location: String,
    pub experience_level_id: i64,
    #[serde(default)]
    pub description: String,
}

pub type UpdateDiveSite = CreateDiveSite;

/// List view: joined with the experience level name.
#[derive(Debug, Serialize, FromRow)]
pub struct DiveSiteSummary {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub experience_level: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DiveSiteDetails {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub experience_level_id: i64,
    pub description: String,
}

impl From<DiveSite> for DiveSiteDetails {
    fn from(s: DiveSite) -> Self {
        Self {
            id: s.id,
            name: s.name,
            location: s.location,
            experience_level_id: s.experience_level_id,
            description: s.description,
        }
    }
}
