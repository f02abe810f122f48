//! Tienda Core - Shared domain types.
//!
//! This crate provides the types used by the checkout service:
//! - identifiers for users and orders
//! - normalised, allow-listed customer emails
//! - peso amounts and the order pricing rules
//! - order status
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP clients, no storage. Everything here can be tested without a
//! runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`pricing`] - Subtotal, tiered discount, shipping, and total

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{LineItem, OrderTotals, PricedCart, PricingError};
pub use types::*;
