use axum::{response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::Profile;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::profiles;

/// GET /api/profile - resolve the caller's profile, creating it on first access
pub async fn get(Extension(auth): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    Ok(Json(json!({ "profile": profile })))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// PATCH /api/profile - self-update of display fields
pub async fn update(
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    if body.display_name.is_none() && body.avatar_url.is_none() {
        return Err(ApiError::bad_request("No updates provided"));
    }

    let pool = DatabaseManager::pool().await?;
    let profile = profiles::resolve(pool, &auth).await?;

    let updated = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET display_name = COALESCE($2, display_name),
            avatar_url = COALESCE($3, avatar_url)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile.id)
    .bind(body.display_name.as_deref())
    .bind(body.avatar_url.as_deref())
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to update profile"))?;

    Ok(Json(json!({ "profile": updated })))
}
