// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password authentication against the backend.

use crate::error::Result;
use crate::models::User;
use crate::services::api::{ApiClient, RegisterRequest};
use crate::services::credentials::{SharedCredentials, ACCESS_TOKEN_KEY};
use crate::state::{Action, Store};

/// Sign-in, registration and sign-out.
///
/// On success the access token is persisted and the store holds the user.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    credentials: SharedCredentials,
    store: Store,
}

impl AuthService {
    pub fn new(api: ApiClient, credentials: SharedCredentials, store: Store) -> Self {
        Self {
            api,
            credentials,
            store,
        }
    }

    /// Log in, persist the token and load the user profile.
    ///
    /// Nothing is persisted when the backend rejects the credentials.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<User> {
        let token = self.api.login(username, password).await?;

        self.credentials
            .set(ACCESS_TOKEN_KEY, &token.access_token)
            .await?;

        let user = self.api.current_user(&token.access_token).await?;
        self.store.dispatch(Action::SetUser(Some(user.clone())));

        tracing::info!(username = %user.username, "Signed in");
        Ok(user)
    }

    /// Create an account, then sign in with the same credentials.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.register(&request).await?;
        tracing::info!(username = %username, "Account registered");

        self.sign_in(username, password).await
    }

    /// Forget the stored token and clear the current user.
    pub async fn sign_out(&self) -> Result<()> {
        self.credentials.remove(ACCESS_TOKEN_KEY).await?;
        self.store.dispatch(Action::SetUser(None));
        tracing::info!("Signed out");
        Ok(())
    }
}
