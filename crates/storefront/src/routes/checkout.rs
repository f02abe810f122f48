//! Checkout route handler.
//!
//! The browser posts the reservation form together with the cart lines it
//! holds. The response tells the page what to do next: which notices to
//! show, whether to close the modal and clear the cart, and where to send
//! the customer for the WhatsApp confirmation.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tienda_core::LineItem;

use crate::checkout::{Cart, CheckoutError, CheckoutForm, CheckoutUi, NoticeLevel};
use crate::error::add_breadcrumb;
use crate::models::Order;
use crate::state::AppState;

/// Checkout submission.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub form: CheckoutForm,
    /// Cart lines; absent when the page has no cart.
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,
}

/// A message for the customer.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Response for checkout submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub notices: Vec<Notice>,
    pub close_modal: bool,
    pub clear_cart: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff_url: Option<String>,
}

/// Cart lines carried by the request.
struct RequestCart {
    lines: Option<Vec<LineItem>>,
    cleared: bool,
}

impl Cart for RequestCart {
    fn lines(&self) -> Option<Vec<LineItem>> {
        self.lines.clone()
    }

    fn clear(&mut self) {
        self.lines = None;
        self.cleared = true;
    }
}

/// Collects UI effects to send back to the page.
#[derive(Default)]
struct ResponseUi {
    notices: Vec<Notice>,
    close_modal: bool,
}

impl CheckoutUi for ResponseUi {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push(Notice {
            level,
            message: message.to_string(),
        });
    }

    fn close_modal(&mut self) {
        self.close_modal = true;
    }
}

/// Submit the reservation form.
///
/// POST /checkout
#[instrument(skip(state, request), fields(items = request.items.as_ref().map_or(0, Vec::len)))]
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> impl IntoResponse {
    add_breadcrumb("checkout", "Reservation form submitted", None);

    let mut cart = RequestCart {
        lines: request.items,
        cleared: false,
    };
    let mut ui = ResponseUi::default();

    let result = state
        .checkout()
        .submit(&request.form, &mut cart, &mut ui)
        .await;

    let (status, order, handoff_url) = match result {
        Ok(receipt) => (
            StatusCode::CREATED,
            Some(receipt.order),
            Some(receipt.handoff_url),
        ),
        Err(CheckoutError::Validation(_)) => (StatusCode::UNPROCESSABLE_ENTITY, None, None),
        Err(CheckoutError::EmptyCart) => (StatusCode::BAD_REQUEST, None, None),
        Err(CheckoutError::Internal(_)) => (StatusCode::INTERNAL_SERVER_ERROR, None, None),
    };

    (
        status,
        Json(CheckoutResponse {
            success: order.is_some(),
            notices: ui.notices,
            close_modal: ui.close_modal,
            clear_cart: cart.cleared,
            order,
            handoff_url,
        }),
    )
}
