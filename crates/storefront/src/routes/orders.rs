//! Order history route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tienda_core::Email;

use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;

/// Query parameters for the order history.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: String,
}

/// Order history response.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// List the orders of the customer with the given email.
///
/// GET /orders?email=
#[instrument(skip(state))]
pub async fn by_email(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<OrdersResponse>> {
    let email = Email::parse(&query.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let user = state
        .store()
        .find_user_by_email(&email)
        .await
        .ok_or_else(|| AppError::NotFound(format!("customer {email}")))?;

    let orders = state.store().list_orders_by_user(&user.id).await;

    Ok(Json(OrdersResponse {
        success: true,
        orders,
    }))
}
