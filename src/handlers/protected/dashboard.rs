use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{profiles, progression};

/// GET /api/dashboard/summary - headline numbers for the caller's dashboard
pub async fn summary(Extension(auth): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let parties_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parties")
        .fetch_one(pool)
        .await
        .map_err(ApiError::db("Failed to count parties"))?;

    let finished_jobs_count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM job_applications WHERE user_id = $1 AND status = 'completed'",
    )
    .bind(profile.id)
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to count completed applications"))?;

    let open_quests_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE status = 'open'")
            .fetch_one(pool)
            .await
            .map_err(ApiError::db("Failed to count open jobs"))?;

    let stats = progression::stats_for(pool, profile.id).await?;
    let rank = progression::resolve_rank(pool, &stats).await?;

    Ok(Json(json!({
        "profile": {
            "id": profile.id,
            "display_name": profile.display_label(),
            "avatar_url": profile.avatar_url,
        },
        "rank": rank.map(|r| json!({ "id": r.id, "name": r.name })),
        "xp": stats.xp,
        "parties_count": parties_count,
        "finished_jobs_count": finished_jobs_count,
        "open_quests_count": open_quests_count,
    })))
}
