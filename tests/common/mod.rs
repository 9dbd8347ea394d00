#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Path, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const GOOD_TOKEN: &str = "good-token";
pub const GOOD_PASSWORD: &str = "correct-horse";

/// What the mock backend saw for one request
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub trace: Option<String>,
}

#[derive(Default)]
pub struct BackendState {
    pub seen: Mutex<Vec<SeenRequest>>,
    pub groceries: Mutex<Vec<Value>>,
    pub recipes: Mutex<Vec<Value>>,
    next_id: Mutex<i64>,
}

impl BackendState {
    fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> SeenRequest {
        self.seen().last().cloned().expect("backend saw no requests")
    }

    pub fn seed_groceries(&self, items: Vec<Value>) {
        *self.state.groceries.lock().unwrap() = items;
    }

    pub fn seed_recipes(&self, items: Vec<Value>) {
        *self.state.recipes.lock().unwrap() = items;
    }

    pub fn set_next_id(&self, id: i64) {
        *self.state.next_id.lock().unwrap() = id;
    }
}

fn header(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

async fn record(State(state): State<Arc<BackendState>>, req: Request, next: Next) -> Response {
    let seen = SeenRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        authorization: header(req.headers(), AUTHORIZATION),
        content_type: header(req.headers(), CONTENT_TYPE),
        trace: header(req.headers(), "x-trace"),
    };
    state.seen.lock().unwrap().push(seen);
    next.run(req).await
}

fn require_token(headers: &HeaderMap) -> Result<(), Response> {
    match header(headers, AUTHORIZATION) {
        Some(v) if v == format!("Bearer {}", GOOD_TOKEN) => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid or expired token" }))).into_response()),
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some("taken@example.com") => {
            (StatusCode::CONFLICT, Json(json!({ "message": "Email already registered" }))).into_response()
        }
        Some("quiet@example.com") => {
            (StatusCode::CREATED, Json(json!({ "details": "Verification pending" }))).into_response()
        }
        _ => (StatusCode::CREATED, Json(json!({ "message": "User registered successfully" }))).into_response(),
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "notoken@example.com" {
        return Json(json!({})).into_response();
    }
    if body["password"] == GOOD_PASSWORD {
        Json(json!({ "token": GOOD_TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))).into_response()
    }
}

async fn list_groceries(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    let groceries = state.groceries.lock().unwrap().clone();
    Json(json!({ "groceries": groceries })).into_response()
}

async fn create_grocery(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    body["id"] = json!(state.next_id());
    state.groceries.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_grocery(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    let mut groceries = state.groceries.lock().unwrap();
    match groceries.iter_mut().find(|g| g["id"] == id) {
        Some(existing) => {
            body["id"] = json!(id);
            *existing = body.clone();
            Json(json!({ "message": "Grocery updated", "grocery": body })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Grocery not found" }))).into_response(),
    }
}

async fn delete_grocery(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    let mut groceries = state.groceries.lock().unwrap();
    let before = groceries.len();
    groceries.retain(|g| g["id"] != id);
    if groceries.len() == before {
        (StatusCode::NOT_FOUND, Json(json!({ "message": "Grocery not found" }))).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn check_expirations(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    let groceries = state.groceries.lock().unwrap().clone();
    let soon: Vec<Value> = groceries.iter().take(1).cloned().collect();
    let expired: Vec<Value> = groceries.iter().skip(1).take(1).cloned().collect();
    Json(json!({ "expiringSoonGroceries": soon, "expiredGroceries": expired })).into_response()
}

async fn list_recipes(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    let recipes = state.recipes.lock().unwrap().clone();
    Json(json!({ "recipes": recipes })).into_response()
}

async fn create_recipe(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    body["id"] = json!(state.next_id());
    state.recipes.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(json!({ "message": "Recipe created", "recipe": body }))).into_response()
}

async fn update_recipe(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    let mut recipes = state.recipes.lock().unwrap();
    match recipes.iter_mut().find(|r| r["id"] == id) {
        Some(existing) => {
            body["id"] = json!(id);
            *existing = body.clone();
            Json(body).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Recipe not found" }))).into_response(),
    }
}

async fn delete_recipe(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = require_token(&headers) {
        return r;
    }
    state.recipes.lock().unwrap().retain(|r| r["id"] != id);
    Json(json!({ "message": "Recipe deleted" })).into_response()
}

fn app(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/groceries", get(list_groceries).post(create_grocery))
        .route("/groceries/check-expirations", get(check_expirations))
        .route("/groceries/:id", put(update_grocery).delete(delete_grocery))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/:id", put(update_recipe).delete(delete_recipe))
        // Unauthenticated probes for gateway behaviour
        .route("/echo", get(|| async { Json(json!({ "ok": true })) }).post(|Json(body): Json<Value>| async move { Json(body) }))
        .route("/not-json", get(|| async { "definitely not json" }))
        .route("/html-error", get(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Starts a fresh mock API on an ephemeral port.
pub async fn spawn_backend() -> Result<MockBackend> {
    let state = Arc::new(BackendState::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind mock backend")?;
    let addr = listener.local_addr()?;
    let router = app(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(MockBackend {
        base_url: format!("http://{}", addr),
        state,
    })
}
