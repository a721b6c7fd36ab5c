use axum::{http::HeaderMap, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::authenticate;
use crate::services::identity::IdentityAdmin;

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub code: Option<String>,
}

/// POST /admin/invite - promote the caller to admin.
///
/// Check order matters: the code is validated before credentials, so a
/// wrong code is a 400 even for anonymous callers, and a correct code
/// without credentials is a 401.
pub async fn promote(
    headers: HeaderMap,
    Json(body): Json<InviteRequest>,
) -> Result<Json<Value>, ApiError> {
    let expected = config::config()
        .security
        .admin_invite_code
        .as_deref()
        .ok_or_else(|| ApiError::internal_server_error("missing"))?;

    if body.code.as_deref() != Some(expected) {
        return Err(ApiError::bad_request("invalid"));
    }

    let caller =
        authenticate(&headers).map_err(|_| ApiError::unauthorized("unauthenticated"))?;

    // Identity metadata is the authoritative copy for session checks
    let admin = IdentityAdmin::from_config()?;
    admin.set_user_role(caller.auth_id, "admin").await?;

    // Profile row copy is best-effort; a failure here is logged and the
    // promotion still succeeds
    match DatabaseManager::pool().await {
        Ok(pool) => {
            let updated = sqlx::query(
                r#"
                UPDATE profiles
                SET role_id = (SELECT id FROM roles WHERE name = 'admin')
                WHERE auth_id = $1
                "#,
            )
            .bind(caller.auth_id)
            .execute(pool)
            .await;

            if let Err(err) = updated {
                tracing::warn!("Failed to mirror admin role onto profile: {}", err);
            }
        }
        Err(err) => {
            tracing::warn!("Failed to mirror admin role onto profile: {}", err);
        }
    }

    Ok(Json(json!({ "success": true })))
}
