//! User model as returned by the backend.

use serde::{Deserialize, Serialize};

/// Authenticated user profile from `/api/users/me` and payment confirmations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Login name
    pub username: String,
    /// Email address (not every response carries it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account role ("user", "admin")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Active subscription plan id (e.g. "monthly_199")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
    /// Any other fields the backend sends, kept as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    /// Badge shown next to the username in the header.
    pub fn badge(&self) -> Option<String> {
        if self.is_admin() {
            Some("ADMIN".to_string())
        } else {
            self.subscription_plan.clone()
        }
    }
}
