// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment request and order status models.

use serde::{Deserialize, Serialize};

use super::User;

/// Order status reported by the backend.
///
/// Anything other than `paid` is non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Other(String),
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => PaymentStatus::Pending,
            "paid" => PaymentStatus::Paid,
            _ => PaymentStatus::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/payment/subscribe`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    pub plan_id: String,
    pub upi_id: String,
    pub phone: String,
}

/// Outcome of a subscription request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubscribeResponse {
    /// Sandbox backend upgraded the plan immediately.
    MockSuccess { user: User },
    /// A UPI collect request was sent; confirmation arrives out-of-band.
    Pending {
        order_id: String,
        #[serde(default)]
        pl_url: Option<String>,
    },
}

/// Order created by a pending subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub plan_id: String,
    pub status: PaymentStatus,
    /// Deep link for completing the payment manually
    pub payment_url: Option<String>,
}

/// Body of `GET /api/payment/status/{order_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: PaymentStatus,
    /// Upgraded user, present once the order is paid
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_status_is_non_terminal() {
        let resp: StatusResponse =
            serde_json::from_value(json!({ "status": "processing" })).unwrap();
        assert_eq!(resp.status, PaymentStatus::Other("processing".to_string()));
        assert!(!resp.status.is_terminal());
        assert!(resp.user.is_none());
    }

    #[test]
    fn test_paid_status_carries_user() {
        let resp: StatusResponse = serde_json::from_value(json!({
            "status": "paid",
            "user": { "username": "alice", "subscription_plan": "monthly_199" }
        }))
        .unwrap();
        assert!(resp.status.is_terminal());
        assert_eq!(resp.user.unwrap().username, "alice");
    }

    #[test]
    fn test_subscribe_pending() {
        let resp: SubscribeResponse = serde_json::from_value(json!({
            "status": "pending",
            "order_id": "TXN1",
            "pl_url": "https://pay.example/TXN1"
        }))
        .unwrap();
        match resp {
            SubscribeResponse::Pending { order_id, pl_url } => {
                assert_eq!(order_id, "TXN1");
                assert_eq!(pl_url.as_deref(), Some("https://pay.example/TXN1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_subscribe_mock_success() {
        let resp: SubscribeResponse = serde_json::from_value(json!({
            "status": "mock_success",
            "user": { "username": "alice", "subscription_plan": "weekly_49" }
        }))
        .unwrap();
        assert!(matches!(resp, SubscribeResponse::MockSuccess { .. }));
    }

    #[test]
    fn test_subscribe_unknown_status_is_rejected() {
        let resp = serde_json::from_value::<SubscribeResponse>(json!({ "status": "failed" }));
        assert!(resp.is_err());
    }
}
