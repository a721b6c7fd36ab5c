use axum::{
    extract::Path,
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{
    transition_allowed, ApplicationWithProfile, Job, JobApplication, APPLICATION_STATUSES,
};
use crate::database::{is_unique_violation, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{access, profiles, progression};

/// POST /api/jobs/:id/applications - apply to an open job
pub async fn apply(
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    // ensure job exists and is open
    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch job"))?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.status != "open" {
        return Err(ApiError::bad_request("Job is not open"));
    }

    // The unique index on (job_id, user_id) is the duplicate check;
    // a violation here means the caller already applied.
    let application = sqlx::query_as::<_, JobApplication>(
        r#"
        INSERT INTO job_applications (id, job_id, user_id, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.id)
    .bind(profile.id)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            ApiError::conflict("Already applied")
        } else {
            ApiError::db("Failed to insert application")(err)
        }
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "application": application }))))
}

/// GET /api/jobs/:id/applications - applicants for a job, owner/admin only
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch job"))?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    access::require_manage(pool, &profile, job.created_by).await?;

    let applications = sqlx::query_as::<_, ApplicationWithProfile>(
        r#"
        SELECT a.id, a.user_id, a.status, a.created_at,
               p.display_name, p.avatar_url
        FROM job_applications a
        LEFT JOIN profiles p ON p.id = a.user_id
        WHERE a.job_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(job.id)
    .fetch_all(pool)
    .await
    .map_err(ApiError::db("Failed to fetch applications"))?;

    Ok(Json(json!({
        "applications": applications.iter().map(ApplicationWithProfile::as_json).collect::<Vec<_>>(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

/// PATCH /api/jobs/:id/applications/:app_id - move an application through
/// its lifecycle; owner/admin only. Completing an application awards the
/// job's reward XP as a side effect.
pub async fn transition(
    Extension(auth): Extension<AuthUser>,
    Path((job_id, app_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    // fetch application and verify it belongs to the job
    let application = sqlx::query_as::<_, JobApplication>(
        "SELECT * FROM job_applications WHERE id = $1 AND job_id = $2",
    )
    .bind(app_id)
    .bind(job_id)
    .fetch_optional(pool)
    .await
    .map_err(ApiError::db("Failed to fetch application"))?
    .ok_or_else(|| ApiError::not_found("Application not found"))?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch job"))?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    access::require_manage(pool, &profile, job.created_by).await?;

    let status = body.status.as_deref().filter(|s| APPLICATION_STATUSES.contains(s));
    let Some(status) = status else {
        return Err(ApiError::bad_request(format!(
            "Invalid status. Allowed: {}",
            APPLICATION_STATUSES.join(", ")
        )));
    };

    if !transition_allowed(&application.status, status) {
        return Err(ApiError::bad_request(format!(
            "Cannot move application from {} to {}",
            application.status, status
        )));
    }

    // If accepting, enforce the slot limit (slots = 0 means unlimited)
    if status == "accepted" && job.slots > 0 {
        let accepted_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM job_applications WHERE job_id = $1 AND status = 'accepted'",
        )
        .bind(job.id)
        .fetch_one(pool)
        .await
        .map_err(ApiError::db("Failed to check accepted count"))?;

        if accepted_count >= job.slots as i64 {
            return Err(ApiError::bad_request("No slots available"));
        }
    }

    let updated = sqlx::query_as::<_, JobApplication>(
        "UPDATE job_applications SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(application.id)
    .bind(status)
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to update application"))?;

    // The status change is authoritative even if settlement fails; the
    // failure is logged and the award can be replayed by hand.
    if status == "completed" {
        if let Err(err) = progression::award_xp(pool, updated.user_id, job.reward_xp).await {
            tracing::error!(
                "Failed to award {} XP to {} for job {}: {}",
                job.reward_xp,
                updated.user_id,
                job.id,
                err
            );
        }
    }

    Ok(Json(json!({ "application": updated })))
}
