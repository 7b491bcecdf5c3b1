// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pricing page.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{catalogue, Plan};
use crate::router::Route;
use crate::App;

pub struct PricingPage {
    app: Arc<App>,
    plans: Vec<Plan>,
}

impl PricingPage {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            plans: catalogue(),
        }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// Go to checkout for the plan with `plan_id`.
    pub fn select(&self, plan_id: &str) -> Result<Plan> {
        let plan = self
            .plans
            .iter()
            .find(|p| p.id == plan_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Plan {}", plan_id)))?;

        tracing::debug!(plan_id = %plan.id, "Plan selected");
        self.app.navigator.navigate(Route::Payment(Some(plan.clone())));
        Ok(plan)
    }
}
