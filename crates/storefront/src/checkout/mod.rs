//! Checkout orchestration.
//!
//! A single linear pipeline, aborting on the first failure:
//!
//! ```text
//! validate form -> read cart -> check and price lines
//!   -> find or register user -> create order -> clear cart
//!   -> close modal -> WhatsApp link
//! ```
//!
//! The cart and the UI are supplied by the caller through the [`Cart`] and
//! [`CheckoutUi`] traits; the service never assumes either exists beyond
//! what those traits promise.

pub mod handoff;
pub mod validation;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use tienda_core::LineItem;

use crate::models::{NewOrder, NewUser, Order, User};
use crate::storage::StoreError;
use crate::store::OrderStore;

pub use handoff::WhatsappHandoff;
pub use validation::{CheckoutForm, ValidatedCustomer, ValidationError, validate, validate_items};

/// Shopping cart owned by the caller.
pub trait Cart: Send {
    /// Current lines, or `None` when there is no cart at all.
    fn lines(&self) -> Option<Vec<LineItem>>;

    /// Empty the cart after a successful order.
    fn clear(&mut self);
}

/// Severity of a customer-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// UI surface the checkout reports to.
pub trait CheckoutUi: Send {
    /// Show a message to the customer.
    fn notify(&mut self, level: NoticeLevel, message: &str);

    /// Close the checkout modal.
    fn close_modal(&mut self);
}

/// Everything produced by a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub user: User,
    pub order: Order,
    /// Pre-filled WhatsApp link for the confirmation chat.
    pub handoff_url: String,
}

/// Why a checkout did not complete.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The form was refused; nothing was stored.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The cart was missing or empty; nothing was stored.
    #[error("cart is empty")]
    EmptyCart,

    /// Local persistence failed.
    #[error("internal error: {0}")]
    Internal(#[from] StoreError),
}

const EMPTY_CART_MESSAGE: &str = "Tu carrito está vacío. Agrega productos antes de reservar.";
const SUCCESS_MESSAGE: &str =
    "¡Pedido registrado! Te llevamos a WhatsApp para confirmar tu reserva.";
const FAILURE_MESSAGE: &str =
    "No pudimos procesar tu pedido. Por favor intenta de nuevo en unos minutos.";

/// Runs checkouts against an [`OrderStore`].
#[derive(Debug, Clone)]
pub struct CheckoutService {
    store: Arc<OrderStore>,
    handoff: WhatsappHandoff,
}

impl CheckoutService {
    #[must_use]
    pub const fn new(store: Arc<OrderStore>, handoff: WhatsappHandoff) -> Self {
        Self { store, handoff }
    }

    /// The store orders are written to.
    #[must_use]
    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Run one checkout and report the result through `ui`.
    ///
    /// Every failure has already been shown to the customer when this
    /// returns; internal errors are also logged and sent to Sentry.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] that stopped the pipeline.
    #[instrument(skip_all, fields(email = %form.email.trim()))]
    pub async fn submit<C: Cart, U: CheckoutUi>(
        &self,
        form: &CheckoutForm,
        cart: &mut C,
        ui: &mut U,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let result = self.place_order(form, cart, ui).await;

        if let Err(err) = &result {
            match err {
                CheckoutError::Validation(e) => {
                    info!(error = %e, "Checkout form rejected");
                    ui.notify(NoticeLevel::Error, e.user_message());
                }
                CheckoutError::EmptyCart => {
                    info!("Checkout submitted with an empty cart");
                    ui.notify(NoticeLevel::Warning, EMPTY_CART_MESSAGE);
                }
                CheckoutError::Internal(_) => {
                    let event_id = sentry::capture_error(err);
                    tracing::error!(
                        error = %err,
                        sentry_event_id = %event_id,
                        "Checkout failed"
                    );
                    ui.notify(NoticeLevel::Error, FAILURE_MESSAGE);
                }
            }
        }

        result
    }

    async fn place_order<C: Cart, U: CheckoutUi>(
        &self,
        form: &CheckoutForm,
        cart: &mut C,
        ui: &mut U,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let customer = validate(form)?;

        let Some(items) = cart.lines().filter(|lines| !lines.is_empty()) else {
            ui.close_modal();
            return Err(CheckoutError::EmptyCart);
        };
        let priced = validate_items(items)?;

        let user = self
            .store
            .register_user(NewUser {
                name: customer.name,
                email: customer.email,
                phone: customer.phone,
                address: customer.address.clone(),
            })
            .await?;

        let order = self
            .store
            .create_order(NewOrder::new(
                user.id.clone(),
                priced,
                customer.address,
                customer.notes,
            ))
            .await?;

        cart.clear();
        ui.close_modal();
        ui.notify(NoticeLevel::Success, SUCCESS_MESSAGE);

        info!(
            order_id = %order.id,
            user_id = %user.id,
            total = %order.totals.total,
            "Checkout completed"
        );

        let handoff_url = self.handoff.link(&user, &order);
        Ok(CheckoutReceipt {
            user,
            order,
            handoff_url,
        })
    }
}
