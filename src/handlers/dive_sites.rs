use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    dto::dive_sites::{CreateDiveSite, DiveSiteDetails, DiveSiteSummary, UpdateDiveSite},
    errors::AppError,
    models::dive_site::DiveSite,
    state::AppState,
};

fn validate(req: &CreateDiveSite) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    Ok(())
}

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DiveSiteSummary>>, AppError> {
    let sites = sqlx::query_as::<_, DiveSiteSummary>(
        r#"
        SELECT s.id, s.name, s.location, l.name AS experience_level, s.description
        FROM dive_sites s JOIN experience_levels l ON l.id = s.experience_level_id
        ORDER BY s.name
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(sites))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DiveSiteDetails>, AppError> {
    let site = sqlx::query_as::<_, DiveSite>("SELECT * FROM dive_sites WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(site.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDiveSite>,
) -> Result<(StatusCode, Json<DiveSiteDetails>), AppError> {
    validate(&req)?;

    let id = sqlx::query(
        "INSERT INTO dive_sites (name, location, experience_level_id, description) VALUES (?, ?, ?, ?)",
    )
    .bind(&req.name)
    .bind(&req.location)
    .bind(req.experience_level_id)
    .bind(&req.description)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(DiveSiteDetails {
            id,
            name: req.name,
            location: req.location,
            experience_level_id: req.experience_level_id,
            description: req.description,
        }),
    ))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDiveSite>,
) -> Result<StatusCode, AppError> {
    validate(&req)?;

    let affected = sqlx::query(
        "UPDATE dive_sites SET name = ?, location = ?, experience_level_id = ?, description = ? WHERE id = ?",
    )
    .bind(&req.name)
    .bind(&req.location)
    .bind(req.experience_level_id)
    .bind(&req.description)
    .bind(id)
    .execute(&state.db)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    sqlx::query("DELETE FROM dive_sites WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
