// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side state store.
//!
//! State changes go through [`Store::dispatch`], which applies the pure
//! [`reduce`] function and notifies subscribers.

use std::sync::Arc;
use tokio::sync::watch;

use crate::models::User;

/// Shared client state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    /// Currently signed-in user, if any
    pub user: Option<User>,
}

/// State transitions accepted by the store.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the current user wholesale (`None` signs out).
    SetUser(Option<User>),
}

/// Compute the next state.
pub fn reduce(state: &ClientState, action: Action) -> ClientState {
    let mut next = state.clone();
    match action {
        Action::SetUser(user) => next.user = user,
    }
    next
}

/// Store handle; clones share the same state.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<ClientState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(ClientState::default())
    }
}

impl Store {
    pub fn new(initial: ClientState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Apply an action and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        self.tx.send_modify(|state| {
            *state = reduce(state, action);
        });
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ClientState {
        self.tx.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    /// Receiver that observes every dispatched change.
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.tx.subscribe()
    }
}
