//! User records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tienda_core::{Email, UserId};

/// A customer, created on their first order.
///
/// There is no update path: a user record is written once and then only
/// looked up by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Remote-assigned or locally synthesized ID.
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    /// Always stored normalised (lower-case).
    pub email: Email,
    pub phone: String,
    pub address: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Data needed to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}

impl User {
    /// Build a local record for `new` with the given ID.
    #[must_use]
    pub fn from_new(id: UserId, new: NewUser, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            created_at,
        }
    }
}
