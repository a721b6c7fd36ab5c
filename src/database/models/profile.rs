use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application-level user record, distinct from the identity provider's
/// account. Created lazily on first authenticated access.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub auth_id: Uuid,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Display name, falling back to "first last" when unset
    pub fn display_label(&self) -> String {
        if let Some(name) = self.display_name.as_deref() {
            if !name.is_empty() {
                return name.to_string();
            }
        }
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            auth_id: Uuid::new_v4(),
            email: None,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            display_name: None,
            avatar_url: None,
            role_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_label_falls_back_to_name_parts() {
        assert_eq!(profile().display_label(), "Ada Lovelace");
    }

    #[test]
    fn display_label_prefers_display_name() {
        let mut p = profile();
        p.display_name = Some("ada.l".into());
        assert_eq!(p.display_label(), "ada.l");
    }

    #[test]
    fn display_label_ignores_empty_display_name() {
        let mut p = profile();
        p.display_name = Some(String::new());
        p.last_name = None;
        assert_eq!(p.display_label(), "Ada");
    }
}
