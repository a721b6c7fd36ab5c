use axum::response::Json;
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, FromRow)]
struct LeaderboardRow {
    xp: i64,
    user_id: Uuid,
    first_name: Option<String>,
    display_name: Option<String>,
    avatar_url: Option<String>,
}

/// GET /leaderboard - top 10 profiles by XP with a 1-based position
pub async fn list() -> Result<Json<Vec<Value>>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT s.xp, s.user_id,
               p.first_name, p.display_name, p.avatar_url
        FROM user_stats s
        JOIN profiles p ON p.id = s.user_id
        ORDER BY s.xp DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(ApiError::db("Failed to fetch leaderboard"))?;

    let list = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            json!({
                "rank": idx + 1,
                "xp": row.xp,
                "user_id": row.user_id,
                "profile": {
                    "id": row.user_id,
                    "first_name": row.first_name,
                    "display_name": row.display_name,
                    "avatar_url": row.avatar_url,
                },
            })
        })
        .collect();

    Ok(Json(list))
}
