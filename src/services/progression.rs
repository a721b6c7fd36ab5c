use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Rank, UserStats};
use crate::error::ApiError;

/// Position within a rank band, for progress-bar display
#[derive(Debug, Clone, Serialize)]
pub struct RankProgress {
    pub min_xp: i64,
    pub max_xp: i64,
    pub percent: u8,
}

impl RankProgress {
    /// Reported when no rank band matches
    pub fn none() -> Self {
        Self {
            min_xp: 0,
            max_xp: 0,
            percent: 0,
        }
    }
}

/// Percent through the band, rounded and clamped to [0, 100]. A
/// degenerate band (max == min) divides by 1 instead of 0.
pub fn progress(xp: i64, rank: &Rank) -> RankProgress {
    let span = (rank.max_xp - rank.min_xp).max(1);
    let percent = ((xp - rank.min_xp) as f64 / span as f64 * 100.0).round();

    RankProgress {
        min_xp: rank.min_xp,
        max_xp: rank.max_xp,
        percent: percent.clamp(0.0, 100.0) as u8,
    }
}

/// Caller's stats row, defaulting to zero XP when absent
pub async fn stats_for(pool: &PgPool, user_id: Uuid) -> Result<UserStats, ApiError> {
    let stats = sqlx::query_as::<_, UserStats>("SELECT * FROM user_stats WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(ApiError::db("Failed to fetch user stats"))?;

    Ok(stats.unwrap_or_else(|| UserStats::empty(user_id)))
}

/// Add `delta` to the user's XP as a single atomic upsert, clamped at
/// zero on both the insert and update paths. Returns the updated row.
pub async fn award_xp(pool: &PgPool, user_id: Uuid, delta: i64) -> Result<UserStats, ApiError> {
    sqlx::query_as::<_, UserStats>(
        r#"
        INSERT INTO user_stats (user_id, xp, updated_at)
        VALUES ($1, GREATEST(0, $2), now())
        ON CONFLICT (user_id)
        DO UPDATE SET xp = GREATEST(0, user_stats.xp + $2), updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(delta)
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to update user stats"))
}

/// Overwrite the user's XP (clamped at zero). Returns the updated row.
pub async fn set_xp(pool: &PgPool, user_id: Uuid, xp: i64) -> Result<UserStats, ApiError> {
    sqlx::query_as::<_, UserStats>(
        r#"
        INSERT INTO user_stats (user_id, xp, updated_at)
        VALUES ($1, GREATEST(0, $2), now())
        ON CONFLICT (user_id)
        DO UPDATE SET xp = GREATEST(0, $2), updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(xp)
    .fetch_one(pool)
    .await
    .map_err(ApiError::db("Failed to update user stats"))
}

/// Resolve the rank for a stats row: the cached `current_rank_id` wins if
/// it still exists, otherwise fall back to the band containing the XP
/// value. Returns None when no band matches.
pub async fn resolve_rank(pool: &PgPool, stats: &UserStats) -> Result<Option<Rank>, ApiError> {
    if let Some(rank_id) = stats.current_rank_id {
        let cached = sqlx::query_as::<_, Rank>("SELECT * FROM ranks WHERE id = $1")
            .bind(rank_id)
            .fetch_optional(pool)
            .await
            .map_err(ApiError::db("Failed to fetch rank"))?;

        if cached.is_some() {
            return Ok(cached);
        }
    }

    sqlx::query_as::<_, Rank>(
        "SELECT * FROM ranks WHERE min_xp <= $1 AND max_xp >= $1 ORDER BY min_xp LIMIT 1",
    )
    .bind(stats.xp)
    .fetch_optional(pool)
    .await
    .map_err(ApiError::db("Failed to fetch rank"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(min_xp: i64, max_xp: i64) -> Rank {
        Rank {
            id: 1,
            name: "Adventurer".into(),
            min_xp,
            max_xp,
        }
    }

    #[test]
    fn percent_at_band_start_is_zero() {
        assert_eq!(progress(100, &rank(100, 200)).percent, 0);
    }

    #[test]
    fn percent_partway_through_band() {
        // 110 xp in [100, 200] -> 10%
        assert_eq!(progress(110, &rank(100, 200)).percent, 10);
    }

    #[test]
    fn percent_is_clamped_to_bounds() {
        assert_eq!(progress(999, &rank(0, 100)).percent, 100);
        assert_eq!(progress(0, &rank(100, 200)).percent, 0);
    }

    #[test]
    fn degenerate_band_does_not_divide_by_zero() {
        assert_eq!(progress(50, &rank(50, 50)).percent, 0);
        assert_eq!(progress(51, &rank(50, 50)).percent, 100);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        // 1/3 through -> 33%, 2/3 through -> 67%
        assert_eq!(progress(1, &rank(0, 3)).percent, 33);
        assert_eq!(progress(2, &rank(0, 3)).percent, 67);
    }
}
