//! Order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tienda_core::{LineItem, OrderId, OrderStatus, OrderTotals, PricedCart, UserId};

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub shipping_address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// An order ready to be persisted.
///
/// Built from a [`PricedCart`], so a `NewOrder` always satisfies
/// `total = subtotal - discount + shipping_cost` for its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub shipping_address: String,
    pub notes: String,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build a pending order for `user_id` from a priced cart.
    #[must_use]
    pub fn new(
        user_id: UserId,
        cart: PricedCart,
        shipping_address: String,
        notes: String,
    ) -> Self {
        let (items, totals) = cart.into_parts();
        Self {
            user_id,
            items,
            totals,
            shipping_address,
            notes,
            status: OrderStatus::Pending,
        }
    }
}

impl Order {
    /// Build a local record for `new` with the given ID.
    ///
    /// Local orders always start as [`OrderStatus::Pending`].
    #[must_use]
    pub fn from_new(id: OrderId, new: NewOrder, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            items: new.items,
            totals: new.totals,
            shipping_address: new.shipping_address,
            notes: new.notes,
            status: OrderStatus::Pending,
            created_at,
        }
    }
}
