// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration page.

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

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub struct RegisterPage {
    app: Arc<App>,
    loading: AtomicBool,
}

impl RegisterPage {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Register and sign in; navigates home on success.
    pub async fn submit(&self, form: &RegisterForm) -> Result<User> {
        let _loading = LoadingGuard::raise(&self.loading);

        let result = match form.validate() {
            Ok(()) => {
                self.app
                    .auth()
                    .register(&form.username, &form.email, &form.password)
                    .await
            }
            Err(errors) => Err(first_validation_error(
                &errors,
                &["username", "email", "password"],
            )),
        };

        match result {
            Ok(user) => {
                self.app
                    .notifier
                    .notify(Notice::success("Account created successfully!"));
                self.app.navigator.navigate(Route::Home);
                Ok(user)
            }
            Err(e) => {
                tracing::info!(error = %e, "Registration failed");
                self.app.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }
}
