use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Profile;
use crate::error::ApiError;
use crate::services::profiles;

/// Owner/leader-or-admin check shared by job and party mutations.
/// `owner` is the resource's owner/leader reference.
pub async fn can_manage(
    pool: &PgPool,
    profile: &Profile,
    owner: Option<Uuid>,
) -> Result<bool, ApiError> {
    if owner == Some(profile.id) {
        return Ok(true);
    }
    profiles::is_admin(pool, profile).await
}

pub async fn require_manage(
    pool: &PgPool,
    profile: &Profile,
    owner: Option<Uuid>,
) -> Result<(), ApiError> {
    if can_manage(pool, profile, owner).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden"))
    }
}

pub async fn require_admin(pool: &PgPool, profile: &Profile) -> Result<(), ApiError> {
    if profiles::is_admin(pool, profile).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden"))
    }
}
