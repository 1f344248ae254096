use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DiveSite {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub experience_level_id: i64,
    pub description: String,
}
