use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Profile, Role};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Find the caller's profile, creating it from identity metadata on first
/// access. The upsert keys on `auth_id`, so concurrent first logins
/// converge on a single row.
pub async fn resolve(pool: &PgPool, auth: &AuthUser) -> Result<Profile, ApiError> {
    let existing = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE auth_id = $1")
        .bind(auth.auth_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch profile"))?;

    if let Some(profile) = existing {
        return Ok(profile);
    }

    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, auth_id, email, display_name, avatar_url)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (auth_id) DO UPDATE SET auth_id = EXCLUDED.auth_id
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth.auth_id)
    .bind(auth.email.as_deref())
    .bind(auth.name.as_deref())
    .bind(auth.avatar_url.as_deref())
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to create profile"))
}

/// Resolve the profile's role name. Looked up fresh on every call; role
/// changes take effect on the next request.
pub async fn role_name(pool: &PgPool, profile: &Profile) -> Result<Option<String>, ApiError> {
    let Some(role_id) = profile.role_id else {
        return Ok(None);
    };

    let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
        .bind(role_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to resolve role"))?;

    Ok(role.map(|r| r.name))
}

pub async fn is_admin(pool: &PgPool, profile: &Profile) -> Result<bool, ApiError> {
    Ok(role_name(pool, profile).await?.as_deref() == Some("admin"))
}
