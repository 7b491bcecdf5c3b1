// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation header.

use std::sync::Arc;

use crate::error::Result;
use crate::models::User;
use crate::router::Route;
use crate::App;

/// Entry in the header navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// Resets the embedding workspace (open documents, chat history).
pub type LeaveSessionHook = Arc<dyn Fn() + Send + Sync>;

pub struct Header {
    app: Arc<App>,
    on_leave: Option<LeaveSessionHook>,
}

impl Header {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            on_leave: None,
        }
    }

    /// Run `hook` when the user leaves the session.
    pub fn with_leave_session(mut self, hook: LeaveSessionHook) -> Self {
        self.on_leave = Some(hook);
        self
    }

    pub fn links(&self) -> Vec<NavLink> {
        vec![
            NavLink {
                label: "Home",
                route: Route::Home,
            },
            NavLink {
                label: "Upload",
                route: Route::Upload,
            },
            NavLink {
                label: "Chat",
                route: Route::Chatbot,
            },
            NavLink {
                label: "Pricing",
                route: Route::Pricing,
            },
        ]
    }

    /// Shown instead of the account when nobody is signed in.
    pub fn guest_links(&self) -> Vec<NavLink> {
        if self.app.store.user().is_some() {
            return Vec::new();
        }
        vec![
            NavLink {
                label: "Login",
                route: Route::Login,
            },
            NavLink {
                label: "Sign Up",
                route: Route::Register,
            },
        ]
    }

    /// Signed-in user and their badge.
    pub fn account(&self) -> Option<(User, Option<String>)> {
        self.app.store.user().map(|user| {
            let badge = user.badge();
            (user, badge)
        })
    }

    pub fn follow(&self, link: &NavLink) {
        self.app.navigator.navigate(link.route.clone());
    }

    /// Sign out and go to the login page.
    pub async fn logout(&self) -> Result<()> {
        self.app.auth().sign_out().await?;
        self.app.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Reset the workspace. Sign-in state is kept.
    pub fn leave_session(&self) {
        tracing::info!("Leaving session");
        if let Some(hook) = &self.on_leave {
            hook();
        }
    }
}
