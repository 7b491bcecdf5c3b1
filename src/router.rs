// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page routes and navigation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::Plan;

/// Client-side routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Pricing,
    /// Checkout, carrying the plan picked on the pricing page.
    Payment(Option<Plan>),
    Upload,
    Chatbot,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Pricing => "/pricing",
            Route::Payment(_) => "/payment",
            Route::Upload => "/upload",
            Route::Chatbot => "/chatbot",
        }
    }

    /// Resolve a path; `/payment` resolves without a plan.
    pub fn from_path(path: &str) -> Option<Self> {
        let route = match path.trim_end_matches('/') {
            "" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/pricing" => Route::Pricing,
            "/payment" => Route::Payment(None),
            "/upload" => Route::Upload,
            "/chatbot" => Route::Chatbot,
            _ => return None,
        };
        Some(route)
    }
}

/// Tracks the current route; clones share it.
#[derive(Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "Navigating");
        self.tx.send_replace(route);
    }

    /// Navigate after `delay`. Aborting the returned handle cancels the redirect.
    pub fn navigate_after(&self, route: Route, delay: Duration) -> JoinHandle<()> {
        let nav = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            nav.navigate(route);
        })
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}
