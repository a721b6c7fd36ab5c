use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::config;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity admin API not configured")]
    NotConfigured,

    #[error("identity admin API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("identity admin API returned {0}")]
    Status(reqwest::StatusCode),
}

/// Client for the identity provider's admin API. Holds the privileged
/// service-role key; used only by the admin promotion flow.
pub struct IdentityAdmin {
    base_url: String,
    service_key: String,
    http: reqwest::Client,
}

impl IdentityAdmin {
    pub fn from_config() -> Result<Self, IdentityError> {
        let identity = &config::config().identity;

        let base_url = identity.admin_url.clone().ok_or(IdentityError::NotConfigured)?;
        let service_key = identity
            .service_key
            .clone()
            .ok_or(IdentityError::NotConfigured)?;

        Ok(Self {
            base_url,
            service_key,
            http: reqwest::Client::new(),
        })
    }

    /// Write `role` into the identity provider's user metadata. This is
    /// the authoritative copy for session-based checks.
    pub async fn set_user_role(&self, auth_id: Uuid, role: &str) -> Result<(), IdentityError> {
        let url = format!(
            "{}/admin/users/{}",
            self.base_url.trim_end_matches('/'),
            auth_id
        );

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.service_key)
            .json(&json!({ "user_metadata": { "role": role } }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::Status(response.status()));
        }

        Ok(())
    }
}
