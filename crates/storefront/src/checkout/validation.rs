//! Reservation form validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. name: letters (accented included) and spaces only
//! 2. address: `<street type> <n> # <n> - <n>`
//! 3. email: normalised, well formed, allow-listed domain
//! 4. name, phone, email, and address all present
//!
//! Cart lines are checked separately by [`validate_items`], once the cart is
//! known to be non-empty.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use tienda_core::{Email, EmailError, LineItem, PricedCart, PricingError};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}\s]+$").expect("Invalid regex"));

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(calle|carrera|avenida|transversal|diagonal|autopista|cll|cl|cra|kr|av|tv|dg)\.?\s*\d+\s*[a-z]?\s*#\s*\d+\s*[a-z]?\s*-\s*\d+",
    )
    .expect("Invalid regex")
});

/// Reservation form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCustomer {
    pub name: String,
    pub phone: String,
    pub email: Email,
    pub address: String,
    pub notes: String,
}

/// Why a form was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must contain only letters and spaces")]
    InvalidName,

    #[error("address does not match the street # number - number format")]
    InvalidAddress,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("name, phone, email and address are required")]
    MissingFields,

    #[error("invalid cart: {0}")]
    InvalidItems(#[from] PricingError),
}

impl ValidationError {
    /// Message shown to the customer.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidName => "Por favor ingresa un nombre válido (solo letras y espacios).",
            Self::InvalidAddress => {
                "Por favor ingresa una dirección válida, por ejemplo: Calle 10 # 12 - 34."
            }
            Self::InvalidEmail(EmailError::DomainNotAllowed { .. }) => {
                "Por favor usa un correo de Gmail, Hotmail, Outlook, Yahoo, Live o iCloud."
            }
            Self::InvalidEmail(_) => "Por favor ingresa un correo electrónico válido.",
            Self::MissingFields => "Por favor completa todos los campos obligatorios.",
            Self::InvalidItems(PricingError::Overflow) => {
                "El valor de tu pedido es demasiado alto. Contáctanos por WhatsApp."
            }
            Self::InvalidItems(_) => {
                "Hay productos inválidos en tu carrito. Actualiza la página e intenta de nuevo."
            }
        }
    }
}

/// Validate a submitted form.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(form: &CheckoutForm) -> Result<ValidatedCustomer, ValidationError> {
    let name = form.name.trim();
    if !NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidName);
    }

    let address = form.address.trim();
    if !ADDRESS_RE.is_match(address) {
        return Err(ValidationError::InvalidAddress);
    }

    let email = Email::parse(&form.email)?;

    let phone = form.phone.trim();
    if name.is_empty() || phone.is_empty() || email.as_str().is_empty() || address.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    Ok(ValidatedCustomer {
        name: name.to_string(),
        phone: phone.to_string(),
        email,
        address: address.to_string(),
        notes: form.notes.trim().to_string(),
    })
}

/// Check the cart lines and price them.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidItems`] for a line with no name, a
/// price of zero or less, a quantity of zero, or totals that overflow.
pub fn validate_items(items: Vec<LineItem>) -> Result<PricedCart, ValidationError> {
    Ok(PricedCart::new(items)?)
}
