use axum::{
    extract::Path,
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Job;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{access, profiles};

/// GET /api/admin/jobs - all jobs regardless of status, newest first
pub async fn list(Extension(auth): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    access::require_admin(pool, &profile).await?;

    let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .map_err(ApiError::db("Failed to fetch jobs"))?;

    Ok(Json(json!({ "data": jobs })))
}

#[derive(Debug, Deserialize)]
pub struct CreateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub reward_xp: Option<i64>,
    pub slots: Option<i32>,
    pub pay: Option<i64>,
    pub location: Option<String>,
    pub recommended_rank_id: Option<i32>,
}

/// POST /api/admin/jobs - post a new job, open by default
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateJob>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    access::require_admin(pool, &profile).await?;

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("title is required"))?;

    let job = sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs
            (id, title, description, category, status, slots, reward_xp, pay,
             location, recommended_rank_id, created_by)
        VALUES ($1, $2, $3, $4, 'open', $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(body.description.as_deref())
    .bind(body.category.as_deref())
    .bind(body.slots.unwrap_or(0).max(0))
    .bind(body.reward_xp.unwrap_or(0).max(0))
    .bind(body.pay.unwrap_or(0).max(0))
    .bind(body.location.as_deref())
    .bind(body.recommended_rank_id)
    .bind(profile.id)
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to insert job"))?;

    Ok((StatusCode::CREATED, Json(json!({ "data": job }))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub reward_xp: Option<i64>,
    pub slots: Option<i32>,
    pub pay: Option<i64>,
    pub location: Option<String>,
}

/// PATCH /api/admin/jobs/:id - partial edit; absent fields keep their value
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<UpdateJob>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    access::require_admin(pool, &profile).await?;

    let job = sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            category = COALESCE($4, category),
            status = COALESCE($5, status),
            reward_xp = COALESCE($6, reward_xp),
            slots = COALESCE($7, slots),
            pay = COALESCE($8, pay),
            location = COALESCE($9, location)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(body.title.as_deref())
    .bind(body.description.as_deref())
    .bind(body.category.as_deref())
    .bind(body.status.as_deref())
    .bind(body.reward_xp)
    .bind(body.slots)
    .bind(body.pay)
    .bind(body.location.as_deref())
    .fetch_optional(pool)
    .await
    .map_err(ApiError::db("Failed to update job"))?
    .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(json!({ "data": job })))
}

/// DELETE /api/admin/jobs/:id
pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;
    access::require_admin(pool, &profile).await?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await
        .map_err(ApiError::db("Failed to delete job"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Job not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
