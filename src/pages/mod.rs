// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page controllers.
//!
//! Each page owns its local view state and talks to the backend through
//! the shared [`App`](crate::App). Rendering is left to the UI layer.

pub mod header;
pub mod login;
pub mod payment;
pub mod pricing;
pub mod register;

use std::sync::atomic::{AtomicBool, Ordering};
use validator::ValidationErrors;

use crate::error::AppError;

pub use header::{Header, LeaveSessionHook, NavLink};
pub use login::{LoginForm, LoginPage};
pub use payment::{CheckoutPage, CheckoutStep, CheckoutView, PaymentForm};
pub use pricing::PricingPage;
pub use register::{RegisterForm, RegisterPage};

/// Something a page can show as busy.
pub(crate) trait LoadingFlag {
    fn set_loading(&self, loading: bool);
}

impl LoadingFlag for AtomicBool {
    fn set_loading(&self, loading: bool) {
        self.store(loading, Ordering::SeqCst);
    }
}

/// Raises a loading flag until dropped.
pub(crate) struct LoadingGuard<'a, F: LoadingFlag + ?Sized>(&'a F);

impl<'a, F: LoadingFlag + ?Sized> LoadingGuard<'a, F> {
    pub(crate) fn raise(flag: &'a F) -> Self {
        flag.set_loading(true);
        Self(flag)
    }
}

impl<F: LoadingFlag + ?Sized> Drop for LoadingGuard<'_, F> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}

/// First validation message, checking fields in form order.
pub(crate) fn first_validation_error(errors: &ValidationErrors, order: &[&str]) -> AppError {
    let fields = errors.field_errors();
    let message = order
        .iter()
        .filter_map(|field| fields.get(*field))
        .chain(fields.values())
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the form".to_string());
    AppError::Validation(message)
}
