// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the Legal AI backend.

use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use legal_ai_client::config::Config;
use legal_ai_client::notify::{ChannelNotifier, Notice};
use legal_ai_client::services::InMemoryCredentialStore;
use legal_ai_client::App;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password: String,
    pub plan: String,
}

/// Scriptable backend state.
pub struct Backend {
    accounts: Mutex<Vec<Account>>,
    /// Subscribe answers `mock_success` instead of `pending`
    pub sandbox: AtomicBool,
    /// Status checks answer `paid` from this call number on
    pub paid_after: AtomicU32,
    /// Status checks up to this call number fail with 500
    pub failing_checks: AtomicU32,
    /// Milliseconds the subscribe handler waits before answering
    pub subscribe_delay_ms: AtomicU64,
    pub subscribe_calls: AtomicU32,
    pub status_calls: AtomicU32,
    /// (order_id, plan_id) of the last status check
    pub last_status_query: Mutex<Option<(String, String)>>,
}

#[allow(dead_code)]
impl Backend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            accounts: Mutex::new(Vec::new()),
            sandbox: AtomicBool::new(false),
            paid_after: AtomicU32::new(u32::MAX),
            failing_checks: AtomicU32::new(0),
            subscribe_delay_ms: AtomicU64::new(0),
            subscribe_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            last_status_query: Mutex::new(None),
        })
    }

    pub fn add_account(&self, username: &str, email: &str, password: &str) {
        self.accounts.lock().unwrap().push(Account {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            plan: "free".to_string(),
        });
    }

    pub fn account(&self, username: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.username == username)
            .cloned()
    }

    fn authorize(&self, headers: &HeaderMap) -> Option<Account> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer token-")?;
        self.account(token)
    }

    fn set_plan(&self, username: &str, plan: &str) -> Option<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.iter_mut().find(|a| a.username == username)?;
        account.plan = plan.to_string();
        Some(account.clone())
    }
}

fn user_json(account: &Account) -> Value {
    json!({
        "username": account.username,
        "email": account.email,
        "role": "user",
        "subscription_plan": account.plan,
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(State(backend): State<Arc<Backend>>, Form(body): Form<LoginBody>) -> Response {
    let accounts = backend.accounts.lock().unwrap();
    let found = accounts.iter().find(|a| {
        (a.username == body.username || a.email == body.username) && a.password == body.password
    });

    match found {
        Some(account) => Json(json!({
            "access_token": format!("token-{}", account.username),
            "token_type": "bearer",
        }))
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
    password: String,
}

async fn register(State(backend): State<Arc<Backend>>, Json(body): Json<RegisterBody>) -> Response {
    if backend.account(&body.username).is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Username already registered" })),
        )
            .into_response();
    }
    backend.add_account(&body.username, &body.email, &body.password);
    Json(json!({ "username": body.username, "email": body.email })).into_response()
}

async fn me(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    match backend.authorize(&headers) {
        Some(account) => Json(user_json(&account)).into_response(),
        None => unauthorized(),
    }
}

#[derive(Deserialize)]
struct SubscribeBody {
    plan_id: String,
    #[allow(dead_code)]
    upi_id: String,
    #[allow(dead_code)]
    phone: String,
}

async fn subscribe(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<SubscribeBody>,
) -> Response {
    let Some(account) = backend.authorize(&headers) else {
        return unauthorized();
    };
    backend.subscribe_calls.fetch_add(1, Ordering::SeqCst);

    let delay = backend.subscribe_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if body.plan_id == "lifetime_1" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Invalid plan" })),
        )
            .into_response();
    }

    if backend.sandbox.load(Ordering::SeqCst) {
        let account = backend
            .set_plan(&account.username, &body.plan_id)
            .unwrap_or(account);
        return Json(json!({ "status": "mock_success", "user": user_json(&account) }))
            .into_response();
    }

    Json(json!({
        "status": "pending",
        "order_id": "TXN1",
        "pl_url": "https://pay.example/TXN1",
    }))
    .into_response()
}

async fn status(
    State(backend): State<Arc<Backend>>,
    Path(order_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let Some(account) = backend.authorize(&headers) else {
        return unauthorized();
    };
    let plan_id = query.get("plan_id").cloned().unwrap_or_default();
    *backend.last_status_query.lock().unwrap() = Some((order_id, plan_id.clone()));

    let call = backend.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if call <= backend.failing_checks.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream gateway error").into_response();
    }

    if call >= backend.paid_after.load(Ordering::SeqCst) {
        let account = backend
            .set_plan(&account.username, &plan_id)
            .unwrap_or(account);
        return Json(json!({ "status": "paid", "user": user_json(&account) })).into_response();
    }

    Json(json!({ "status": "pending" })).into_response()
}

/// Serve the mock backend on an ephemeral port and return its base URL.
#[allow(dead_code)]
pub async fn spawn_backend(backend: Arc<Backend>) -> String {
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/users/me", get(me))
        .route("/api/payment/subscribe", post(subscribe))
        .route("/api/payment/status/{order_id}", get(status))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Client wired to in-memory credentials and a notice channel.
pub struct TestClient {
    pub app: Arc<App>,
    pub credentials: InMemoryCredentialStore,
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

#[allow(dead_code)]
impl TestClient {
    /// All notices raised so far.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            notices.push(notice);
        }
        notices
    }
}

/// Config with fast polling for tests.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    Config {
        api_base: base_url.to_string(),
        poll_interval: Duration::from_millis(25),
        poll_max_attempts: Some(40),
        redirect_delay: Duration::from_millis(25),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn test_client(config: Config) -> TestClient {
    let credentials = InMemoryCredentialStore::new();
    let (notifier, notices) = ChannelNotifier::channel();
    let app = App::new(config, Arc::new(credentials.clone()), Arc::new(notifier))
        .expect("Failed to build test client");

    TestClient {
        app: Arc::new(app),
        credentials,
        notices,
    }
}

/// Backend with one account and a client already signed in as it.
#[allow(dead_code)]
pub async fn signed_in_client(backend: &Arc<Backend>) -> TestClient {
    backend.add_account("alice", "alice@example.com", "wonderland");
    let base_url = spawn_backend(backend.clone()).await;
    let mut client = test_client(test_config(&base_url));

    client
        .app
        .auth()
        .sign_in("alice", "wonderland")
        .await
        .expect("sign in");
    client.drain_notices();
    client
}
