use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named XP band. Read-only reference data, inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rank {
    pub id: i32,
    pub name: String,
    pub min_xp: i64,
    pub max_xp: i64,
}

/// Per-profile running XP total. `current_rank_id` is a cache and may be
/// null or stale; rank is re-resolved lazily on read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserStats {
    pub user_id: Uuid,
    pub xp: i64,
    pub current_rank_id: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Zero row used when a profile has no stats yet
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            xp: 0,
            current_rank_id: None,
            updated_at: None,
        }
    }
}
