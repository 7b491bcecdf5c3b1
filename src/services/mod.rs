// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend access and the payment poller.

pub mod api;
pub mod auth;
pub mod credentials;
pub mod poller;

pub use api::{ApiClient, AuthorizedApi};
pub use auth::AuthService;
pub use credentials::{
    CredentialStore, FileCredentialStore, InMemoryCredentialStore, SharedCredentials,
    ACCESS_TOKEN_KEY,
};
pub use poller::{
    PaymentPoller, PaymentStatusSource, PollHandle, PollPolicy, PollSession, PollState,
};
