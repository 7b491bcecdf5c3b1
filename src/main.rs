// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Legal AI client
//!
//! Loads configuration, restores any persisted session and reports who is
//! signed in and what plan they are on.

use anyhow::Context;
use legal_ai_client::{config::Config, logging::init_logging, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging().context("Failed to initialize logging")?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(api_base = %config.api_base, "Starting Legal AI client");

    let app = App::from_config(config)?;

    match app.restore_session().await? {
        Some(user) => tracing::info!(
            username = %user.username,
            plan = user.badge().as_deref().unwrap_or("free"),
            route = app.navigator.current().path(),
            "Signed in"
        ),
        None => tracing::info!("No stored session, sign in required"),
    }

    Ok(())
}
