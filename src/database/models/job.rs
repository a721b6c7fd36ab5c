use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A postable task with reward XP and limited acceptance slots.
/// `status` is a free-form string; only `open` jobs accept applications.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub slots: i32,
    pub reward_xp: i64,
    pub pay: i64,
    pub location: Option<String>,
    pub recommended_rank_id: Option<i32>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Links a profile to a job. At most one row per (job_id, user_id),
/// enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Application row joined with the applicant's display fields,
/// as returned to the job owner.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationWithProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ApplicationWithProfile {
    pub fn as_json(&self) -> Value {
        json!({
            "id": self.id,
            "user_id": self.user_id,
            "status": self.status,
            "created_at": self.created_at,
            "profile": {
                "display_name": self.display_name,
                "avatar_url": self.avatar_url,
            },
        })
    }
}

pub const APPLICATION_STATUSES: &[&str] = &["pending", "accepted", "rejected", "completed"];

/// Application lifecycle: pending -> accepted | rejected, accepted -> completed
pub fn transition_allowed(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        ("pending", "accepted") | ("pending", "rejected") | ("accepted", "completed")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_decided() {
        assert!(transition_allowed("pending", "accepted"));
        assert!(transition_allowed("pending", "rejected"));
    }

    #[test]
    fn only_accepted_can_complete() {
        assert!(transition_allowed("accepted", "completed"));
        assert!(!transition_allowed("pending", "completed"));
        assert!(!transition_allowed("rejected", "completed"));
    }

    #[test]
    fn terminal_states_stay_put() {
        assert!(!transition_allowed("completed", "accepted"));
        assert!(!transition_allowed("rejected", "accepted"));
        assert!(!transition_allowed("accepted", "pending"));
    }
}
