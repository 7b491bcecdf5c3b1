// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Legal AI client core
//!
//! Headless client for the Legal AI web product: backend API access,
//! credential persistence, client state, navigation, page controllers and
//! the payment confirmation poller. A UI layer renders on top of it.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod pages;
pub mod router;
pub mod services;
pub mod state;

use std::sync::Arc;

use config::Config;
use error::{AppError, Result};
use models::User;
use notify::{LogNotifier, Notifier};
use router::Navigator;
use services::{
    ApiClient, AuthService, AuthorizedApi, FileCredentialStore, SharedCredentials,
    ACCESS_TOKEN_KEY,
};
use state::{Action, Store};

/// Shared client state handed to every page.
pub struct App {
    pub config: Config,
    pub api: ApiClient,
    pub credentials: SharedCredentials,
    pub store: Store,
    pub navigator: Navigator,
    pub notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(
        config: Config,
        credentials: SharedCredentials,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let api = ApiClient::new(&config.api_base, config.request_timeout)?;
        Ok(Self {
            config,
            api,
            credentials,
            store: Store::default(),
            navigator: Navigator::default(),
            notifier,
        })
    }

    /// File-backed credentials and log-backed notices.
    pub fn from_config(config: Config) -> Result<Self> {
        let credentials = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
        Self::new(config, credentials, Arc::new(LogNotifier))
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.api.clone(),
            self.credentials.clone(),
            self.store.clone(),
        )
    }

    pub fn authorized_api(&self) -> AuthorizedApi {
        AuthorizedApi::new(self.api.clone(), self.credentials.clone())
    }

    /// Reload the user for a token persisted by an earlier run.
    ///
    /// A token the backend rejects is discarded.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        if self.credentials.get(ACCESS_TOKEN_KEY).await?.is_none() {
            return Ok(None);
        }

        match self.authorized_api().current_user().await {
            Ok(user) => {
                tracing::info!(username = %user.username, "Session restored");
                self.store.dispatch(Action::SetUser(Some(user.clone())));
                Ok(Some(user))
            }
            Err(AppError::Api { status: 401, .. }) => {
                tracing::info!("Stored token rejected, discarding");
                self.credentials.remove(ACCESS_TOKEN_KEY).await?;
                self.store.dispatch(Action::SetUser(None));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
