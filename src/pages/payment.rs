// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment checkout page.
//!
//! Steps: `Input -> Processing -> Success`. A pending UPI payment is
//! confirmed by polling; the page owns the poll session and releases it
//! (and any pending redirect) when dropped.
//!
//! The step and loading flag are published on a watch channel so the UI
//! can render them while `initiate` or `await_confirmation` is running.

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use validator::Validate;

use super::{first_validation_error, LoadingFlag, LoadingGuard};
use crate::error::Result;
use crate::models::{PaymentOrder, PaymentStatus, Plan, SubscribeRequest, SubscribeResponse};
use crate::notify::Notice;
use crate::router::Route;
use crate::services::{PaymentPoller, PollHandle, PollPolicy, PollSession, PollState};
use crate::state::Action;
use crate::App;

/// Checkout step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStep {
    Input,
    /// Waiting for the backend; `order` is set once the UPI request is sent.
    Processing { order: Option<PaymentOrder> },
    Success,
}

/// What the checkout view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    /// Payment request in flight; the pay button shows "Initiating..."
    pub loading: bool,
}

impl Default for CheckoutView {
    fn default() -> Self {
        Self {
            step: CheckoutStep::Input,
            loading: false,
        }
    }
}

impl LoadingFlag for watch::Sender<CheckoutView> {
    fn set_loading(&self, loading: bool) {
        self.send_if_modified(|view| {
            let changed = view.loading != loading;
            view.loading = loading;
            changed
        });
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaymentForm {
    /// Phone number for the SMS payment link
    #[validate(length(min = 10, message = "Please enter a valid phone number"))]
    pub phone: String,
    /// UPI id (GPay, PhonePe, Paytm), e.g. "name@bank"
    #[validate(contains(pattern = "@", message = "Please enter a valid UPI ID"))]
    pub upi_id: String,
}

pub struct CheckoutPage {
    app: Arc<App>,
    plan: Plan,
    poller: PaymentPoller,
    view: watch::Sender<CheckoutView>,
    session: Option<PollSession>,
    redirect: Option<JoinHandle<()>>,
}

impl CheckoutPage {
    /// Open checkout for `plan`, or the default plan when navigation carried none.
    pub fn new(app: Arc<App>, plan: Option<Plan>) -> Self {
        let poller = PaymentPoller::new(
            Arc::new(app.authorized_api()),
            app.store.clone(),
            PollPolicy::from_config(&app.config),
        );
        let (view, _) = watch::channel(CheckoutView::default());

        Self {
            plan: plan.unwrap_or_else(Plan::checkout_default),
            app,
            poller,
            view,
            session: None,
            redirect: None,
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn view(&self) -> CheckoutView {
        self.view.borrow().clone()
    }

    pub fn step(&self) -> CheckoutStep {
        self.view.borrow().step.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.view.borrow().loading
    }

    /// Follow step and loading changes.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutView> {
        self.view.subscribe()
    }

    /// Active or finished poll session for the current order.
    pub fn session(&self) -> Option<&PollSession> {
        self.session.as_ref()
    }

    /// Handle for cancelling the pending payment from the UI while
    /// [`await_confirmation`](Self::await_confirmation) is running.
    pub fn cancel_handle(&self) -> Option<PollHandle> {
        self.session.as_ref().map(PollSession::handle)
    }

    fn set_step(&self, step: CheckoutStep) {
        self.view.send_modify(|view| view.step = step);
    }

    /// Validate the form and send the payment request.
    ///
    /// Validation failures make no network call. Request failures return
    /// the page to `Input`.
    pub async fn initiate(&mut self, form: &PaymentForm) -> Result<CheckoutStep> {
        if let Err(errors) = form.validate() {
            let err = first_validation_error(&errors, &["upi_id", "phone"]);
            self.app.notifier.notify(Notice::error(err.user_message()));
            return Err(err);
        }

        if let Some(previous) = self.session.take() {
            previous.cancel();
        }
        self.set_step(CheckoutStep::Processing { order: None });
        let _loading = LoadingGuard::raise(&self.view);

        let request = SubscribeRequest {
            plan_id: self.plan.id.clone(),
            upi_id: form.upi_id.clone(),
            phone: form.phone.clone(),
        };

        match self.app.authorized_api().subscribe(&request).await {
            Ok(SubscribeResponse::MockSuccess { user }) => {
                tracing::info!(plan_id = %self.plan.id, "Plan upgraded by sandbox backend");
                self.app.store.dispatch(Action::SetUser(Some(user)));
                self.set_step(CheckoutStep::Success);
                self.app
                    .notifier
                    .notify(Notice::success("Sandbox Mode: Plan upgraded."));
                schedule_redirect(&self.app, &mut self.redirect);
            }
            Ok(SubscribeResponse::Pending { order_id, pl_url }) => {
                let order = PaymentOrder {
                    order_id,
                    plan_id: self.plan.id.clone(),
                    status: PaymentStatus::Pending,
                    payment_url: pl_url,
                };
                self.app
                    .notifier
                    .notify(Notice::info("UPI Request sent! Check your phone/SMS."));
                self.session = Some(
                    self.poller
                        .start(order.order_id.clone(), order.plan_id.clone()),
                );
                self.set_step(CheckoutStep::Processing { order: Some(order) });
            }
            Err(e) => {
                tracing::info!(error = %e, plan_id = %self.plan.id, "Payment initiation failed");
                self.app.notifier.notify(Notice::error(e.user_message()));
                self.set_step(CheckoutStep::Input);
                return Err(e);
            }
        }

        Ok(self.step())
    }

    /// Wait for the pending payment to settle and update the view.
    ///
    /// Returns immediately when no payment is pending. To let the user
    /// abandon the payment meanwhile, cancel through [`cancel_handle`](Self::cancel_handle);
    /// this then returns `Input`.
    pub async fn await_confirmation(&mut self) -> CheckoutStep {
        let Some(session) = self.session.as_ref() else {
            return self.step();
        };

        match session.wait().await {
            PollState::Confirmed => {
                self.set_step(CheckoutStep::Success);
                self.app
                    .notifier
                    .notify(Notice::success("Payment Verified! Your plan is updated."));
                schedule_redirect(&self.app, &mut self.redirect);
            }
            PollState::Expired => {
                self.app.notifier.notify(Notice::error(
                    "Payment was not confirmed in time. Please try again.",
                ));
                self.set_step(CheckoutStep::Input);
            }
            PollState::Cancelled | PollState::Polling => {
                self.set_step(CheckoutStep::Input);
            }
        }

        self.session = None;
        self.step()
    }

    /// Abandon the pending payment and return to the form.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        if self.step() != CheckoutStep::Success {
            self.set_step(CheckoutStep::Input);
        }
    }
}

/// Redirect home after the configured delay, replacing any pending redirect.
fn schedule_redirect(app: &App, slot: &mut Option<JoinHandle<()>>) {
    if let Some(previous) = slot.take() {
        previous.abort();
    }
    *slot = Some(
        app.navigator
            .navigate_after(Route::Home, app.config.redirect_delay),
    );
}

impl Drop for CheckoutPage {
    fn drop(&mut self) {
        // The poll session cancels itself when dropped
        if let Some(redirect) = self.redirect.take() {
            redirect.abort();
        }
    }
}
