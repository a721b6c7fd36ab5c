use axum::response::Json;

use crate::database::models::Rank;
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// GET /ranks - all rank bands, lowest first
pub async fn list() -> Result<Json<Vec<Rank>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let ranks = sqlx::query_as::<_, Rank>("SELECT * FROM ranks ORDER BY min_xp ASC")
        .fetch_all(pool)
        .await
        .map_err(ApiError::db("Failed to fetch ranks"))?;

    Ok(Json(ranks))
}
