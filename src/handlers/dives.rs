use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    dto::dives::{CreateDive, DiveDetails, DiveSummary, UpdateDive},
    errors::AppError,
    models::dive::Dive,
    state::AppState,
};

fn validate(max_depth: i64) -> Result<(), AppError> {
    if !(1..=500).contains(&max_depth) {
        return Err(AppError::Validation(
            "max_depth must be between 1 and 500 meters".into(),
        ));
    }
    Ok(())
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DiveSummary>>, AppError> {
    let dives = sqlx::query_as::<_, DiveSummary>(
        r#"
        SELECT d.id, s.name AS dive_site, d.date, d.max_depth, d.duration
        FROM dives d JOIN dive_sites s ON s.id = d.dive_site_id
        ORDER BY d.date DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(dives))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DiveDetails>, AppError> {
    let dive = sqlx::query_as::<_, Dive>("SELECT * FROM dives WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(dive.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDive>,
) -> Result<(StatusCode, Json<DiveDetails>), AppError> {
    validate(req.max_depth)?;

    let id = sqlx::query(
        "INSERT INTO dives (dive_site_id, date, duration, max_depth) VALUES (?, ?, ?, ?)",
    )
    .bind(req.dive_site_id)
    .bind(req.date)
    .bind(req.duration)
    .bind(req.max_depth)
    .execute(&state.db)
    .await?
    .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(DiveDetails {
            id,
            dive_site_id: req.dive_site_id,
            date: req.date,
            max_depth: req.max_depth,
            duration: req.duration,
        }),
    ))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDive>,
) -> Result<StatusCode, AppError> {
    validate(req.max_depth)?;

    let affected = sqlx::query(
        "UPDATE dives SET dive_site_id = ?, date = ?, duration = ?, max_depth = ? WHERE id = ?",
    )
    .bind(req.dive_site_id)
    .bind(req.date)
    .bind(req.duration)
    .bind(req.max_depth)
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
    sqlx::query("DELETE FROM dives WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
