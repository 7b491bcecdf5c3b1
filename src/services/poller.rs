// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment confirmation poller.
//!
//! After a UPI collect request is sent, the backend confirms the payment
//! out-of-band. The poller checks the order status once per interval until
//! the order is paid, the session is cancelled, or the tick budget runs out.
//!
//! Session lifecycle: `Polling -> {Confirmed, Cancelled, Expired}`. Terminal
//! transitions are made under the session's watch channel lock, so only the
//! first one applies; results of ticks that finish afterwards are discarded.
//! Each tick runs as its own task so a slow response never delays the timer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::{Config, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_ATTEMPTS};
use crate::error::Result;
use crate::models::{StatusResponse, User};
use crate::state::{Action, Store};

/// Where the poller reads order status from.
#[async_trait]
pub trait PaymentStatusSource: Send + Sync {
    async fn payment_status(&self, order_id: &str, plan_id: &str) -> Result<StatusResponse>;
}

/// State of one poll session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    /// Order paid; the returned user was applied to the store.
    Confirmed,
    /// Stopped by the owner or superseded by a newer session.
    Cancelled,
    /// Tick budget exhausted without confirmation.
    Expired,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        self != PollState::Polling
    }
}

/// Tick interval and budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until confirmed or cancelled.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: Some(DEFAULT_POLL_MAX_ATTEMPTS),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.poll_max_attempts,
        }
    }

    /// Policy with the interval raised to [`MIN_POLL_INTERVAL`].
    pub fn normalized(self) -> Self {
        Self {
            interval: self.interval.max(MIN_POLL_INTERVAL),
            ..self
        }
    }
}

/// Shortest interval the timer accepts.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

struct SessionInner {
    order_id: String,
    plan_id: String,
    started_at: DateTime<Utc>,
    state: watch::Sender<PollState>,
    /// Status checks issued so far
    ticks: AtomicU32,
    timer: OnceLock<AbortHandle>,
}

impl SessionInner {
    fn is_active(&self) -> bool {
        *self.state.borrow() == PollState::Polling
    }

    /// Move from `Polling` to a terminal state. Returns false if already terminal.
    fn finish(&self, to: PollState) -> bool {
        self.state.send_if_modified(|state| {
            if *state != PollState::Polling {
                return false;
            }
            *state = to;
            true
        })
    }

    /// Confirm the session, applying the paid user in the same step.
    fn confirm(&self, store: &Store, user: Option<User>) -> bool {
        self.state.send_if_modified(|state| {
            if *state != PollState::Polling {
                return false;
            }
            match user {
                Some(user) => store.dispatch(Action::SetUser(Some(user))),
                None => tracing::warn!(
                    order_id = %self.order_id,
                    "Paid status carried no user; keeping current user"
                ),
            }
            *state = PollState::Confirmed;
            true
        })
    }

    fn cancel(&self) -> bool {
        let cancelled = self.finish(PollState::Cancelled);
        if let Some(timer) = self.timer.get() {
            timer.abort();
        }
        cancelled
    }
}

/// Starts poll sessions; at most one of its sessions is active at a time.
pub struct PaymentPoller {
    source: Arc<dyn PaymentStatusSource>,
    store: Store,
    policy: PollPolicy,
    current: Mutex<Option<Arc<SessionInner>>>,
}

impl PaymentPoller {
    pub fn new(source: Arc<dyn PaymentStatusSource>, store: Store, policy: PollPolicy) -> Self {
        if policy.interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                interval_ms = policy.interval.as_millis() as u64,
                "Poll interval too short, using minimum"
            );
        }

        Self {
            source,
            store,
            policy: policy.normalized(),
            current: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Begin polling `order_id`, cancelling this poller's previous session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, order_id: impl Into<String>, plan_id: impl Into<String>) -> PollSession {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = current.take() {
            if previous.cancel() {
                tracing::info!(
                    order_id = %previous.order_id,
                    "Superseded poll session cancelled"
                );
            }
        }

        let (state, state_rx) = watch::channel(PollState::Polling);
        let inner = Arc::new(SessionInner {
            order_id: order_id.into(),
            plan_id: plan_id.into(),
            started_at: Utc::now(),
            state,
            ticks: AtomicU32::new(0),
            timer: OnceLock::new(),
        });

        let handle = tokio::spawn(run_timer(
            inner.clone(),
            state_rx,
            self.source.clone(),
            self.store.clone(),
            self.policy,
            TimerRelease(inner.clone()),
        ));
        let _ = inner.timer.set(handle.abort_handle());

        tracing::info!(
            order_id = %inner.order_id,
            plan_id = %inner.plan_id,
            interval_ms = self.policy.interval.as_millis() as u64,
            max_attempts = ?self.policy.max_attempts,
            "Payment polling started"
        );

        *current = Some(inner.clone());
        PollSession { inner }
    }
}

/// Handle to one poll session. Dropping it cancels the session.
pub struct PollSession {
    inner: Arc<SessionInner>,
}

impl PollSession {
    pub fn order_id(&self) -> &str {
        &self.inner.order_id
    }

    pub fn plan_id(&self) -> &str {
        &self.inner.plan_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }

    pub fn state(&self) -> PollState {
        *self.inner.state.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Number of status checks issued.
    pub fn ticks(&self) -> u32 {
        self.inner.ticks.load(Ordering::Relaxed)
    }

    /// Stop future ticks. Returns true if this call ended the session.
    pub fn cancel(&self) -> bool {
        let cancelled = self.inner.cancel();
        if cancelled {
            tracing::info!(order_id = %self.inner.order_id, "Payment polling cancelled");
        }
        cancelled
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.inner.state.subscribe()
    }

    /// Wait for the session to reach a terminal state.
    pub async fn wait(&self) -> PollState {
        let mut rx = self.inner.state.subscribe();
        let state = match rx.wait_for(|state| state.is_terminal()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        state
    }

    /// Cancel-only handle that can outlive borrows of this session.
    pub fn handle(&self) -> PollHandle {
        PollHandle {
            inner: self.inner.clone(),
        }
    }
}

/// Cloneable handle for cancelling a session from another task.
///
/// Unlike [`PollSession`], dropping it leaves the session running.
#[derive(Clone)]
pub struct PollHandle {
    inner: Arc<SessionInner>,
}

impl PollHandle {
    pub fn order_id(&self) -> &str {
        &self.inner.order_id
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Stop future ticks. Returns true if this call ended the session.
    pub fn cancel(&self) -> bool {
        let cancelled = self.inner.cancel();
        if cancelled {
            tracing::info!(order_id = %self.inner.order_id, "Payment polling cancelled");
        }
        cancelled
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        if self.inner.cancel() {
            tracing::debug!(order_id = %self.inner.order_id, "Poll session released");
        }
    }
}

/// Ends the session however the timer task exits, even if it never ran, so
/// `wait()` always resolves.
struct TimerRelease(Arc<SessionInner>);

impl Drop for TimerRelease {
    fn drop(&mut self) {
        if self.0.finish(PollState::Cancelled) {
            tracing::warn!(order_id = %self.0.order_id, "Poll timer stopped unexpectedly");
        }
    }
}

async fn run_timer(
    inner: Arc<SessionInner>,
    mut state_rx: watch::Receiver<PollState>,
    source: Arc<dyn PaymentStatusSource>,
    store: Store,
    policy: PollPolicy,
    _release: TimerRelease,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + policy.interval, policy.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut in_flight = JoinSet::new();
    let mut attempts: u32 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !inner.is_active() {
                    break;
                }
                if policy.max_attempts.is_some_and(|max| attempts >= max) {
                    if inner.finish(PollState::Expired) {
                        tracing::warn!(
                            order_id = %inner.order_id,
                            attempts,
                            "Payment not confirmed within tick budget"
                        );
                    }
                    break;
                }
                attempts += 1;
                inner.ticks.store(attempts, Ordering::Relaxed);
                in_flight.spawn(tick(inner.clone(), source.clone(), store.clone(), attempts));
            }
            changed = state_rx.changed() => {
                if changed.is_err() || state_rx.borrow_and_update().is_terminal() {
                    break;
                }
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    // Dropping the JoinSet aborts ticks still waiting on the network
    tracing::debug!(
        order_id = %inner.order_id,
        attempts,
        state = ?*inner.state.borrow(),
        "Payment poll timer stopped"
    );
}

async fn tick(
    inner: Arc<SessionInner>,
    source: Arc<dyn PaymentStatusSource>,
    store: Store,
    attempt: u32,
) {
    let result = source
        .payment_status(&inner.order_id, &inner.plan_id)
        .await;

    if !inner.is_active() {
        tracing::debug!(order_id = %inner.order_id, attempt, "Discarding late status result");
        return;
    }

    match result {
        Ok(response) if response.status.is_terminal() => {
            if inner.confirm(&store, response.user) {
                tracing::info!(order_id = %inner.order_id, attempt, "Payment confirmed");
            } else {
                tracing::debug!(order_id = %inner.order_id, attempt, "Discarding late status result");
            }
        }
        Ok(response) => {
            tracing::debug!(
                order_id = %inner.order_id,
                attempt,
                status = %response.status,
                "Payment not yet confirmed"
            );
        }
        Err(e) => {
            tracing::warn!(
                order_id = %inner.order_id,
                attempt,
                error = %e,
                "Payment status check failed, retrying next tick"
            );
        }
    }
}
