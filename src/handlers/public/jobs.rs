use axum::{extract::Query, response::Json};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::Job;
use crate::database::DatabaseManager;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    /// Rank name; `All Difficulties` disables the filter
    pub difficulty: Option<String>,
    /// `All Categories` disables the filter
    pub category: Option<String>,
    /// `Last Week` | `Last Month`; `Recent` / `All Time` disable the filter
    pub date_posted: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /jobs - browse open jobs, newest first
pub async fn list(Query(query): Query<JobsQuery>) -> Result<Json<Value>, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    // If difficulty provided and not the default label, resolve rank id
    let mut rank_id: Option<i32> = None;
    if let Some(difficulty) = query.difficulty.as_deref() {
        if difficulty != "All Difficulties" {
            rank_id = sqlx::query_scalar::<_, i32>("SELECT id FROM ranks WHERE name = $1 LIMIT 1")
                .bind(difficulty)
                .fetch_optional(pool)
                .await
                .map_err(ApiError::db("Failed to resolve difficulty"))?;
        }
    }

    let since = match query.date_posted.as_deref() {
        Some("Last Week") => Some(Utc::now() - Duration::days(7)),
        Some("Last Month") => Some(Utc::now() - Duration::days(30)),
        _ => None,
    };

    // only open jobs by default
    let mut builder =
        sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT * FROM jobs WHERE status = ");
    builder.push_bind("open");

    if let Some(category) = query.category.as_deref() {
        if category != "All Categories" {
            builder.push(" AND category = ").push_bind(category.to_string());
        }
    }

    if let Some(rank_id) = rank_id {
        builder.push(" AND recommended_rank_id = ").push_bind(rank_id);
    }

    if let Some(since) = since {
        builder.push(" AND created_at >= ").push_bind(since);
    }

    builder
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let jobs: Vec<Job> = builder
        .build_query_as()
        .fetch_all(pool)
        .await
        .map_err(ApiError::db("Failed to fetch jobs"))?;

    Ok(Json(json!({ "jobs": jobs })))
}
