//! Shared helpers for storefront integration tests.

#![allow(clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

use tienda_storefront::backend::{Availability, BackendClient};
use tienda_storefront::config::OrdersApiConfig;
use tienda_storefront::storage::JsonFileStorage;
use tienda_storefront::store::OrderStore;

/// Fresh directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("tienda-it-{}", uuid::Uuid::new_v4()))
}

/// Serve `router` on an ephemeral port and return its `/api` base URL.
pub async fn spawn(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api")).unwrap()
}

pub fn api_config(base_url: Url, probe_timeout: Duration) -> OrdersApiConfig {
    OrdersApiConfig {
        base_url,
        token: None,
        probe_timeout,
    }
}

/// Probe the API the way the binary does and open a store on `dir`.
pub async fn open_store(dir: &std::path::Path, api: Option<&OrdersApiConfig>) -> OrderStore {
    let backend = api.map(BackendClient::new);
    let availability = match &backend {
        Some(client) => client.probe().await,
        None => Availability::Offline,
    };
    let storage = JsonFileStorage::open(dir).await.unwrap();
    OrderStore::open(storage, backend, availability).await.unwrap()
}

/// Records kept by the mock orders API.
#[derive(Debug, Default)]
pub struct MockApi {
    pub users: Vec<Value>,
    pub orders: Vec<Value>,
}

pub type SharedApi = Arc<Mutex<MockApi>>;

/// A working orders API that assigns `_id`s like the real one.
pub fn healthy_api(api: SharedApi) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "ok" }))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/orders", get(list_orders).post(create_order))
        .with_state(api)
}

/// An API that answers its health check and fails everything else.
pub fn failing_api() -> Router {
    let fail = || async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "database down" })),
        )
    };
    Router::new()
        .route("/api/health", get(|| async { "ok" }))
        .route("/api/users", get(fail).post(fail))
        .route("/api/orders", get(fail).post(fail))
}

/// An API whose health check takes longer than `delay`.
pub fn slow_api(delay: Duration) -> Router {
    Router::new().route(
        "/api/health",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "ok"
        }),
    )
}

async fn list_users(State(api): State<SharedApi>) -> Json<Value> {
    let api = api.lock().await;
    Json(json!({ "success": true, "users": api.users }))
}

async fn create_user(State(api): State<SharedApi>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut api = api.lock().await;
    body["_id"] = json!(format!("remote-user-{}", api.users.len() + 1));
    body["createdAt"] = json!("2026-03-01T15:00:00Z");
    api.users.push(body.clone());
    Json(json!({ "success": true, "user": body }))
}

async fn list_orders(
    State(api): State<SharedApi>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let api = api.lock().await;
    let orders: Vec<&Value> = api
        .orders
        .iter()
        .filter(|o| query.get("userId").is_none_or(|id| o["userId"] == json!(id)))
        .collect();
    Json(json!({ "success": true, "orders": orders }))
}

async fn create_order(State(api): State<SharedApi>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut api = api.lock().await;
    body["_id"] = json!(format!("remote-order-{}", api.orders.len() + 1));
    body["createdAt"] = json!("2026-03-01T15:05:00Z");
    api.orders.push(body.clone());
    Json(json!({ "success": true, "order": body }))
}
