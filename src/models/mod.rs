// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client.

pub mod payment;
pub mod plan;
pub mod user;

pub use payment::{PaymentOrder, PaymentStatus, StatusResponse, SubscribeRequest, SubscribeResponse};
pub use plan::{catalogue, find_plan, Plan};
pub use user::User;
