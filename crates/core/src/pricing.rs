//! Order pricing: subtotal, tiered discount, and flat-rate shipping.
//!
//! ```text
//! subtotal >= 500.000            -> 10% discount
//! 300.000 <= subtotal < 500.000  ->  5% discount
//! 0 < subtotal < 150.000         -> 25.000 shipping
//! total = subtotal - discount + shipping
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subtotal at which the 10% discount applies.
pub const LARGE_ORDER_THRESHOLD: Decimal = Decimal::from_parts(500_000, 0, 0, false, 0);

/// Subtotal at which the 5% discount applies.
pub const MEDIUM_ORDER_THRESHOLD: Decimal = Decimal::from_parts(300_000, 0, 0, false, 0);

/// Subtotal from which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(150_000, 0, 0, false, 0);

/// Flat shipping fee for orders under [`FREE_SHIPPING_THRESHOLD`].
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(25_000, 0, 0, false, 0);

const LARGE_ORDER_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
const MEDIUM_ORDER_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// A single cart line as ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product name as shown to the customer.
    pub name: String,
    /// Unit price in pesos.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Number of units.
    pub quantity: u32,
}

impl LineItem {
    /// `price * quantity`, or `None` if it does not fit in a `Decimal`.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Why a list of cart lines cannot be priced.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("no items to price")]
    NoItems,

    #[error("line {line}: product name is empty")]
    MissingName { line: usize },

    #[error("line {line}: price must be greater than zero")]
    NonPositivePrice { line: usize },

    #[error("line {line}: quantity must be at least 1")]
    ZeroQuantity { line: usize },

    #[error("order amount is too large")]
    Overflow,
}

/// Cart lines that passed the line checks, with their totals.
///
/// The only way to build one is [`PricedCart::new`], so the totals always
/// match the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    items: Vec<LineItem>,
    totals: OrderTotals,
}

impl PricedCart {
    /// Check every line and price the cart.
    ///
    /// # Errors
    ///
    /// Returns the first [`PricingError`] found: an empty list, a line with
    /// no name, a price of zero or less, a quantity of zero, or a subtotal
    /// that overflows.
    pub fn new(items: Vec<LineItem>) -> Result<Self, PricingError> {
        if items.is_empty() {
            return Err(PricingError::NoItems);
        }

        let mut subtotal = Decimal::ZERO;
        for (index, item) in items.iter().enumerate() {
            let line = index + 1;
            if item.name.trim().is_empty() {
                return Err(PricingError::MissingName { line });
            }
            if item.price <= Decimal::ZERO {
                return Err(PricingError::NonPositivePrice { line });
            }
            if item.quantity == 0 {
                return Err(PricingError::ZeroQuantity { line });
            }
            subtotal = item
                .line_total()
                .and_then(|total| subtotal.checked_add(total))
                .ok_or(PricingError::Overflow)?;
        }

        Ok(Self {
            items,
            totals: OrderTotals::for_subtotal(subtotal),
        })
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub const fn totals(&self) -> OrderTotals {
        self.totals
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<LineItem>, OrderTotals) {
        (self.items, self.totals)
    }
}

/// Computed money fields of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderTotals {
    /// Apply discount and shipping rules to a non-negative subtotal.
    #[must_use]
    pub fn for_subtotal(subtotal: Decimal) -> Self {
        let discount = discount_for(subtotal);
        let shipping_cost = shipping_for(subtotal);

        Self {
            subtotal,
            discount,
            shipping_cost,
            total: subtotal - discount + shipping_cost,
        }
    }
}

/// Tiered discount for a subtotal.
#[must_use]
pub fn discount_for(subtotal: Decimal) -> Decimal {
    if subtotal >= LARGE_ORDER_THRESHOLD {
        subtotal * LARGE_ORDER_RATE
    } else if subtotal >= MEDIUM_ORDER_THRESHOLD {
        subtotal * MEDIUM_ORDER_RATE
    } else {
        Decimal::ZERO
    }
}

/// Shipping fee for a subtotal.
#[must_use]
pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal > Decimal::ZERO && subtotal < FREE_SHIPPING_THRESHOLD {
        SHIPPING_FEE
    } else {
        Decimal::ZERO
    }
}
