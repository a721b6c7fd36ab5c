use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A team grouping of profiles. The creator becomes leader; the leader's
/// membership row is written in the same transaction as the party.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub leader_id: Option<Uuid>,
    pub category: Option<String>,
    pub min_rank_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// At most one membership per (party_id, user_id), enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PartyMember {
    pub id: i64,
    pub party_id: i64,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Membership row joined with the member's display fields
#[derive(Debug, Clone, FromRow)]
pub struct PartyMemberWithProfile {
    pub id: i64,
    pub party_id: i64,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl PartyMemberWithProfile {
    pub fn as_json(&self) -> Value {
        json!({
            "id": self.id,
            "party_id": self.party_id,
            "user_id": self.user_id,
            "role": self.role,
            "joined_at": self.joined_at,
            "profile": {
                "display_name": self.display_name,
                "avatar_url": self.avatar_url,
            },
        })
    }
}
