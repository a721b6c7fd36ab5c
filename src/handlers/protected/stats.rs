use axum::{response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{profiles, progression};

/// GET /api/user/stats - caller's XP, resolved rank, and band progress
pub async fn get(Extension(auth): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let stats = progression::stats_for(pool, profile.id).await?;
    let rank = progression::resolve_rank(pool, &stats).await?;

    let progress = rank
        .as_ref()
        .map(|rank| progression::progress(stats.xp, rank))
        .unwrap_or_else(progression::RankProgress::none);

    Ok(Json(json!({
        "profile": {
            "id": profile.id,
            "display_name": profile.display_label(),
            "avatar_url": profile.avatar_url,
            "role_id": profile.role_id,
        },
        "stats": {
            "user_id": stats.user_id,
            "xp": stats.xp,
            "updated_at": stats.updated_at,
        },
        "rank": rank,
        "progress": progress,
    })))
}

#[derive(Debug, Deserialize)]
pub struct StatsUpdate {
    /// Relative XP change; may be negative, result clamps at zero
    pub delta: Option<i64>,
    /// Absolute XP value; takes precedence over `delta`
    pub xp: Option<i64>,
}

/// PATCH /api/user/stats - set or adjust the caller's XP
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<StatsUpdate>,
) -> Result<Json<Value>, ApiError> {
    if body.delta.is_none() && body.xp.is_none() {
        return Err(ApiError::bad_request("Provide `delta` or `xp` in request body"));
    }

    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let stats = match (body.xp, body.delta) {
        (Some(xp), _) => progression::set_xp(pool, profile.id, xp).await?,
        (None, Some(delta)) => progression::award_xp(pool, profile.id, delta).await?,
        (None, None) => unreachable!(),
    };

    let rank = progression::resolve_rank(pool, &stats).await?;

    Ok(Json(json!({ "stats": stats, "rank": rank })))
}
