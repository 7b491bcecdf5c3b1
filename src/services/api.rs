// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Legal AI backend API client.
//!
//! Handles:
//! - Password login and registration
//! - Current user lookup
//! - Subscription payment initiation and order status checks

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{StatusResponse, SubscribeRequest, SubscribeResponse, User};
use crate::services::credentials::{SharedCredentials, ACCESS_TOKEN_KEY};
use crate::services::poller::PaymentStatusSource;

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange username (or email) and password for an access token.
    ///
    /// POST /api/auth/login (form encoded)
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = format!("{}/api/auth/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        check_response_json(response, "Login failed").await
    }

    /// Create an account.
    ///
    /// POST /api/auth/register
    pub async fn register(&self, request: &RegisterRequest) -> Result<serde_json::Value> {
        let url = format!("{}/api/auth/register", self.base_url);

        let response = self.http.post(&url).json(request).send().await?;

        check_response_json(response, "Registration failed").await
    }

    /// Get the authenticated user's profile.
    pub async fn current_user(&self, access_token: &str) -> Result<User> {
        let url = format!("{}/api/users/me", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        check_response_json(response, "Failed to load user profile").await
    }

    /// Start a subscription payment for a plan.
    pub async fn subscribe(
        &self,
        access_token: &str,
        request: &SubscribeRequest,
    ) -> Result<SubscribeResponse> {
        let url = format!("{}/api/payment/subscribe", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await?;

        check_response_json(response, "Payment initiation failed").await
    }

    /// Check the status of a payment order.
    ///
    /// GET /api/payment/status/{order_id}?plan_id=
    pub async fn payment_status(
        &self,
        access_token: &str,
        order_id: &str,
        plan_id: &str,
    ) -> Result<StatusResponse> {
        let url = format!(
            "{}/api/payment/status/{}",
            self.base_url,
            urlencoding::encode(order_id)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("plan_id", plan_id)])
            .send()
            .await?;

        check_response_json(response, "Payment status check failed").await
    }
}

/// Check response status and parse the JSON body.
///
/// Non-2xx responses become [`AppError::Api`] carrying the backend's
/// `detail` string, or `fallback` when there is none.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 {
            tracing::debug!(body = %body, "Backend rejected credentials (401)");
        }

        return Err(AppError::Api {
            status: status.as_u16(),
            message: error_detail(&body).unwrap_or_else(|| fallback.to_string()),
        });
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Http(format!("JSON parse error: {}", e)))
}

/// Extract a string `detail` from an error body.
///
/// Structured details (validation error lists) are not shown to users.
fn error_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: Option<serde_json::Value>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Login response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// AuthorizedApi - endpoints that need the stored bearer token
// ─────────────────────────────────────────────────────────────────────────────

/// API client paired with the credential store.
///
/// The token is read from storage on every call so a logout or re-login
/// takes effect immediately.
#[derive(Clone)]
pub struct AuthorizedApi {
    api: ApiClient,
    credentials: SharedCredentials,
}

impl AuthorizedApi {
    pub fn new(api: ApiClient, credentials: SharedCredentials) -> Self {
        Self { api, credentials }
    }

    async fn token(&self) -> Result<String> {
        self.credentials
            .get(ACCESS_TOKEN_KEY)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    pub async fn current_user(&self) -> Result<User> {
        let token = self.token().await?;
        self.api.current_user(&token).await
    }

    pub async fn subscribe(&self, request: &SubscribeRequest) -> Result<SubscribeResponse> {
        let token = self.token().await?;
        self.api.subscribe(&token, request).await
    }
}

#[async_trait]
impl PaymentStatusSource for AuthorizedApi {
    async fn payment_status(&self, order_id: &str, plan_id: &str) -> Result<StatusResponse> {
        let token = self.token().await?;
        self.api.payment_status(&token, order_id, plan_id).await
    }
}
