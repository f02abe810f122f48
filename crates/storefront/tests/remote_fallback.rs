//! Store behaviour against a live, failing, or slow orders API.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::Mutex;

use tienda_core::{Email, LineItem, OrderStatus, PricedCart, UserId};
use tienda_storefront::backend::Availability;
use tienda_storefront::models::{NewOrder, NewUser};
use tienda_storefront::storage::JsonFileStorage;
use tienda_storefront::store::OrderStore;

use common::{MockApi, api_config, failing_api, healthy_api, open_store, slow_api, spawn, temp_dir};

fn laura() -> NewUser {
    NewUser {
        name: "Laura Gómez".to_string(),
        email: Email::parse("laura@gmail.com").unwrap(),
        phone: "3001234567".to_string(),
        address: "Calle 10 # 12 - 34".to_string(),
    }
}

fn order_for(user_id: &UserId, unit_price: i64, quantity: u32) -> NewOrder {
    NewOrder::new(
        user_id.clone(),
        PricedCart::new(vec![LineItem {
            name: "Mochila wayuu".to_string(),
            price: Decimal::new(unit_price, 0),
            quantity,
        }])
        .unwrap(),
        "Calle 10 # 12 - 34".to_string(),
        "Entregar en portería".to_string(),
    )
}

#[tokio::test]
async fn test_remote_order_is_mirrored_locally() {
    let api = Arc::new(Mutex::new(MockApi::default()));
    let base_url = spawn(healthy_api(api.clone())).await;
    let config = api_config(base_url, Duration::from_secs(2));
    let dir = temp_dir();

    let store = open_store(&dir, Some(&config)).await;
    assert_eq!(store.availability(), Availability::Online);

    let user = store.register_user(laura()).await.unwrap();
    assert_eq!(user.id.as_str(), "remote-user-1");

    let order = store
        .create_order(order_for(&user.id, 100_000, 2))
        .await
        .unwrap();
    assert_eq!(order.id.as_str(), "remote-order-1");
    assert_eq!(order.totals.shipping_cost, Decimal::ZERO);
    assert_eq!(order.totals.total, Decimal::new(200_000, 0));

    assert_eq!(api.lock().await.orders.len(), 1);

    // Users stay remote; orders are mirrored.
    let reopened = open_store(&dir, None).await;
    assert!(reopened.users().await.is_empty());
    assert_eq!(reopened.orders().await, vec![order.clone()]);

    let history = store.list_orders_by_user(&user.id).await;
    assert_eq!(history, vec![order]);
}

#[tokio::test]
async fn test_second_registration_reuses_remote_user() {
    let api = Arc::new(Mutex::new(MockApi::default()));
    let base_url = spawn(healthy_api(api.clone())).await;
    let config = api_config(base_url, Duration::from_secs(2));
    let store = open_store(&temp_dir(), Some(&config)).await;

    let first = store.register_user(laura()).await.unwrap();
    let second = store.register_user(laura()).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(api.lock().await.users.len(), 1);
}

#[tokio::test]
async fn test_rejected_requests_fall_back_to_local_storage() {
    let base_url = spawn(failing_api()).await;
    let config = api_config(base_url, Duration::from_secs(2));
    let dir = temp_dir();

    let store = open_store(&dir, Some(&config)).await;
    // The health check passed, so the API is tried first.
    assert_eq!(store.availability(), Availability::Online);

    let user = store.register_user(laura()).await.unwrap();
    assert!(user.id.as_str().starts_with("local-"));

    let order = store
        .create_order(order_for(&user.id, 200_000, 2))
        .await
        .unwrap();
    assert!(order.id.as_str().starts_with("local-"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.totals.discount, Decimal::new(20_000, 0));
    assert_eq!(order.totals.total, Decimal::new(380_000, 0));

    let found = store.find_user_by_email(&laura().email).await;
    assert_eq!(found, Some(user.clone()));
    assert_eq!(store.list_orders_by_user(&user.id).await, vec![order]);
}

#[tokio::test]
async fn test_slow_health_check_means_offline() {
    let base_url = spawn(slow_api(Duration::from_millis(500))).await;
    let config = api_config(base_url, Duration::from_millis(50));
    let dir = temp_dir();

    let store = open_store(&dir, Some(&config)).await;
    assert_eq!(store.availability(), Availability::Offline);

    let user = store.register_user(laura()).await.unwrap();
    let order = store
        .create_order(order_for(&user.id, 400_000, 1))
        .await
        .unwrap();

    assert_eq!(order.totals.subtotal, Decimal::new(400_000, 0));
    assert_eq!(order.totals.discount, Decimal::new(20_000, 0));
    assert_eq!(order.totals.shipping_cost, Decimal::ZERO);
    assert_eq!(order.totals.total, Decimal::new(380_000, 0));

    let raw = tokio::fs::read_to_string(dir.join("orders.json")).await.unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["total"], serde_json::json!(380_000.0));
    assert_eq!(stored[0]["status"], "pending");
}

#[tokio::test]
async fn test_unreachable_api_is_offline() {
    let config = api_config(
        url::Url::parse("http://127.0.0.1:9/api").unwrap(),
        Duration::from_millis(200),
    );
    let store = open_store(&temp_dir(), Some(&config)).await;
    assert_eq!(store.availability(), Availability::Offline);
}

#[tokio::test]
async fn test_corrupt_local_file_fails_to_open() {
    let dir = temp_dir();
    let storage = JsonFileStorage::open(&dir).await.unwrap();
    tokio::fs::write(dir.join("orders.json"), "{not json")
        .await
        .unwrap();

    let result = OrderStore::open(storage, None, Availability::Offline).await;
    assert!(result.is_err());
}
