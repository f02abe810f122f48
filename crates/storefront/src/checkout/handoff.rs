//! WhatsApp confirmation handoff.
//!
//! After an order is stored the customer is sent to a `wa.me` deep link with
//! the order summary pre-filled, so the store can confirm payment and
//! delivery by chat.

use std::fmt::Write as _;

use tienda_core::Price;

use crate::models::{Order, User};

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Builds pre-filled WhatsApp links for one store number.
#[derive(Debug, Clone)]
pub struct WhatsappHandoff {
    number: String,
}

impl WhatsappHandoff {
    /// `number` is digits only, international format (e.g. `573001234567`).
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    /// Deep link opening a chat with the order summary as the draft message.
    #[must_use]
    pub fn link(&self, user: &User, order: &Order) -> String {
        format!(
            "{WHATSAPP_BASE_URL}/{}?text={}",
            self.number,
            urlencoding::encode(&order_summary(user, order))
        )
    }
}

/// Plain-text order summary sent to the store.
#[must_use]
pub fn order_summary(user: &User, order: &Order) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "¡Hola! Quiero confirmar mi pedido #{}", order.id);
    text.push('\n');
    let _ = writeln!(text, "*Cliente:* {}", user.name);
    let _ = writeln!(text, "*Teléfono:* {}", user.phone);
    let _ = writeln!(text, "*Correo:* {}", user.email);
    let _ = writeln!(text, "*Dirección:* {}", order.shipping_address);
    if !order.notes.is_empty() {
        let _ = writeln!(text, "*Notas:* {}", order.notes);
    }

    text.push('\n');
    let _ = writeln!(text, "*Productos:*");
    for item in &order.items {
        match item.line_total() {
            Some(line_total) => {
                let _ = writeln!(
                    text,
                    "- {} x{} ({})",
                    item.name,
                    item.quantity,
                    Price::cop(line_total)
                );
            }
            None => {
                let _ = writeln!(text, "- {} x{}", item.name, item.quantity);
            }
        }
    }

    let totals = &order.totals;
    text.push('\n');
    let _ = writeln!(text, "Subtotal: {}", Price::cop(totals.subtotal));
    if !totals.discount.is_zero() {
        let _ = writeln!(text, "Descuento: -{}", Price::cop(totals.discount));
    }
    let shipping = if totals.shipping_cost.is_zero() {
        "Gratis".to_string()
    } else {
        Price::cop(totals.shipping_cost).to_string()
    };
    let _ = writeln!(text, "Envío: {shipping}");
    let _ = write!(text, "*Total: {}*", Price::cop(totals.total));

    text
}
