//! HTTP-level tests for the checkout and order history routes.

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

use tienda_storefront::config::StorefrontConfig;
use tienda_storefront::routes;
use tienda_storefront::state::AppState;
use tienda_storefront::store::OrderStore;

use common::{MockApi, api_config, healthy_api, open_store, spawn, temp_dir};

fn config() -> StorefrontConfig {
    let vars: HashMap<&str, &str> = HashMap::from([("WHATSAPP_NUMBER", "+57 300 123 4567")]);
    StorefrontConfig::from_source(&|key: &str| vars.get(key).map(ToString::to_string)).unwrap()
}

fn app(store: OrderStore) -> Router {
    routes::routes().with_state(AppState::new(config(), store))
}

fn checkout_body(items: &Value) -> Value {
    json!({
        "name": "Laura Gómez",
        "phone": "300 123 4567",
        "email": "Laura@Gmail.com",
        "address": "Calle 10 # 12 - 34",
        "notes": "Entregar en portería",
        "items": items,
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, body)
}

fn post_checkout(body: &Value) -> Request<Body> {
    Request::post("/checkout")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_checkout_creates_local_order_and_handoff() {
    let dir = temp_dir();
    let app = app(open_store(&dir, None).await);

    let items = json!([
        { "name": "Mochila wayuu", "price": 200000, "quantity": 2 }
    ]);
    let (status, body) = send(app, post_checkout(&checkout_body(&items))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["closeModal"], true);
    assert_eq!(body["clearCart"], true);
    assert_eq!(body["notices"][0]["level"], "success");

    let order = &body["order"];
    assert_eq!(order["subtotal"], json!(400_000.0));
    assert_eq!(order["discount"], json!(20_000.0));
    assert_eq!(order["shippingCost"], json!(0.0));
    assert_eq!(order["total"], json!(380_000.0));
    assert_eq!(order["status"], "pending");
    assert!(order["id"].as_str().unwrap().starts_with("local-"));

    let url = body["handoffUrl"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/573001234567?text="));

    let stored = open_store(&dir, None).await;
    assert_eq!(stored.users().await.len(), 1);
    assert_eq!(stored.users().await[0].email.as_str(), "laura@gmail.com");
    assert_eq!(stored.orders().await.len(), 1);
}

#[tokio::test]
async fn test_checkout_with_empty_cart_closes_modal_and_stores_nothing() {
    let dir = temp_dir();
    let app = app(open_store(&dir, None).await);

    let (status, body) = send(app, post_checkout(&checkout_body(&json!([])))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["closeModal"], true);
    assert_eq!(body["clearCart"], false);
    assert_eq!(body["notices"][0]["level"], "warning");
    assert!(body.get("order").is_none());

    let stored = open_store(&dir, None).await;
    assert!(stored.users().await.is_empty());
    assert!(stored.orders().await.is_empty());
}

#[tokio::test]
async fn test_checkout_without_cart_is_empty_cart() {
    let app = app(open_store(&temp_dir(), None).await);

    let mut body = checkout_body(&Value::Null);
    body.as_object_mut().unwrap().remove("items");
    let (status, body) = send(app, post_checkout(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["closeModal"], true);
}

#[tokio::test]
async fn test_checkout_rejects_invalid_address() {
    let dir = temp_dir();
    let app = app(open_store(&dir, None).await);

    let mut body = checkout_body(&json!([
        { "name": "Mochila wayuu", "price": 90000, "quantity": 1 }
    ]));
    body["address"] = json!("Barrio El Prado");
    let (status, body) = send(app, post_checkout(&body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["closeModal"], false);
    assert_eq!(body["clearCart"], false);
    assert_eq!(body["notices"][0]["level"], "error");

    let stored = open_store(&dir, None).await;
    assert!(stored.users().await.is_empty());
}

#[tokio::test]
async fn test_checkout_goes_to_remote_api_when_online() {
    let api = Arc::new(Mutex::new(MockApi::default()));
    let base_url = spawn(healthy_api(api.clone())).await;
    let config = api_config(base_url, Duration::from_secs(2));
    let app = app(open_store(&temp_dir(), Some(&config)).await);

    let items = json!([
        { "name": "Sombrero vueltiao", "price": 90000, "quantity": 1 }
    ]);
    let (status, body) = send(app, post_checkout(&checkout_body(&items))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["id"], "remote-order-1");
    assert_eq!(body["order"]["userId"], "remote-user-1");
    assert_eq!(body["order"]["shippingCost"], json!(25_000.0));
    assert_eq!(body["order"]["total"], json!(115_000.0));

    let api = api.lock().await;
    assert_eq!(api.users.len(), 1);
    assert_eq!(api.orders[0]["status"], "pending");
}

#[tokio::test]
async fn test_order_history_by_email() {
    let dir = temp_dir();
    let store = open_store(&dir, None).await;
    let app = app(store);

    let items = json!([
        { "name": "Mochila wayuu", "price": 160000, "quantity": 1 }
    ]);
    let (status, _) = send(app.clone(), post_checkout(&checkout_body(&items))).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = Request::get("/orders?email=laura%40gmail.com")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);
    assert_eq!(body["orders"][0]["total"], json!(160_000.0));

    let request = Request::get("/orders?email=nadie%40gmail.com")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let request = Request::get("/orders?email=laura%40empresa.co")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app(open_store(&temp_dir(), None).await);

    let (status, body) = send(
        app.clone(),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));

    let (status, body) = send(
        app,
        Request::get("/health/ready").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ordersApi"], "offline");
    assert_eq!(body["ordersApiConfigured"], false);
}

#[tokio::test]
async fn test_checkout_rejects_invalid_cart_lines() {
    let dir = temp_dir();
    let app = app(open_store(&dir, None).await);

    for items in [
        json!([{ "name": "Mochila wayuu", "price": -500_000, "quantity": 1 }]),
        json!([{ "name": "Mochila wayuu", "price": 0, "quantity": 1 }]),
        json!([{ "name": "Mochila wayuu", "price": 90_000, "quantity": 0 }]),
        json!([{ "name": "", "price": 90_000, "quantity": 1 }]),
        json!([{ "name": "Mochila wayuu", "price": 1e20, "quantity": 4_000_000_000_u32 }]),
    ] {
        let (status, body) = send(app.clone(), post_checkout(&checkout_body(&items))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{items}");
        assert_eq!(body["success"], false);
        assert_eq!(body["clearCart"], false);
        assert_eq!(body["notices"][0]["level"], "error");
        assert!(body.get("order").is_none());
    }

    let stored = open_store(&dir, None).await;
    assert!(stored.users().await.is_empty());
    assert!(stored.orders().await.is_empty());
}

#[tokio::test]
async fn test_checkout_storage_failure_is_internal_error() {
    let dir = temp_dir();
    let store = open_store(&dir, None).await;
    tokio::fs::create_dir(dir.join(".orders.json.tmp"))
        .await
        .unwrap();
    let app = app(store);

    let items = json!([
        { "name": "Mochila wayuu", "price": 90000, "quantity": 1 }
    ]);
    let (status, body) = send(app, post_checkout(&checkout_body(&items))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["clearCart"], false);
    assert_eq!(body["closeModal"], false);
    assert_eq!(body["notices"].as_array().unwrap().len(), 1);
    assert_eq!(body["notices"][0]["level"], "error");
    assert!(
        body["notices"][0]["message"]
            .as_str()
            .unwrap()
            .starts_with("No pudimos procesar tu pedido")
    );
    assert!(body.get("order").is_none());

    tokio::fs::remove_dir(dir.join(".orders.json.tmp"))
        .await
        .unwrap();
    assert!(open_store(&dir, None).await.orders().await.is_empty());
}
