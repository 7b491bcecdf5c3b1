// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login page.

use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use validator::Validate;

use super::{first_validation_error, LoadingGuard};
use crate::error::Result;
use crate::models::User;
use crate::notify::Notice;
use crate::router::Route;
use crate::App;

/// Sign-in form; the email doubles as the login username.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub struct LoginPage {
    app: Arc<App>,
    loading: AtomicBool,
}

impl LoginPage {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Submit the form. Navigates home on success; failures are shown as
    /// an error notice and leave the route unchanged.
    pub async fn submit(&self, form: &LoginForm) -> Result<User> {
        let _loading = LoadingGuard::raise(&self.loading);

        let result = match form.validate() {
            Ok(()) => self.app.auth().sign_in(&form.email, &form.password).await,
            Err(errors) => Err(first_validation_error(&errors, &["email", "password"])),
        };

        match result {
            Ok(user) => {
                self.app
                    .notifier
                    .notify(Notice::success(format!("Welcome back, {}!", user.username)));
                self.app.navigator.navigate(Route::Home);
                Ok(user)
            }
            Err(e) => {
                tracing::info!(error = %e, "Login failed");
                self.app.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }
}
