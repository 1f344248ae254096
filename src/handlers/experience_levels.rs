use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    auth::jwt::AuthUser, errors::AppError, models::experience_level::ExperienceLevel,
    state::AppState,
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<ExperienceLevel>>, AppError> {
    let levels =
        sqlx::query_as::<_, ExperienceLevel>("SELECT * FROM experience_levels ORDER BY id")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(levels))
}
