//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness + orders API availability
//!
//! # Checkout
//! POST /checkout               - Submit the reservation form with cart lines
//!
//! # Orders
//! GET  /orders?email=          - Order history of one customer
//! ```

pub mod checkout;
pub mod orders;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Readiness payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: &'static str,
    /// Whether `ORDERS_API_URL` is set.
    pub orders_api_configured: bool,
    /// `online` when orders go to the API first, `offline` when only local.
    pub orders_api: String,
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// The store always accepts orders, so this never fails; it reports which
/// path orders take.
pub async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        status: "ok",
        orders_api_configured: state.config().orders_api.is_some(),
        orders_api: state.store().availability().to_string(),
    })
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/checkout", post(checkout::submit))
        .route("/orders", get(orders::by_email))
}
