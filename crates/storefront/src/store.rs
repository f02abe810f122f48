//! Order/user store with a remote-first, local-fallback policy.
//!
//! When the store is built with [`Availability::Online`], every operation
//! tries the orders API first. Any non-success [`RemoteOutcome`] is logged
//! and the operation continues on the local mirror, so a checkout always
//! completes even if the API is down. Remote and local records are never
//! reconciled.
//!
//! The local mirror is an in-memory list per record type, written through
//! to [`JsonFileStorage`] on every mutation.

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use tienda_core::{Email, OrderId, UserId};

use crate::backend::{Availability, BackendClient, RemoteOutcome};
use crate::models::{NewOrder, NewUser, Order, User};
use crate::storage::{JsonFileStorage, ORDERS_KEY, StoreError, USERS_KEY};

/// Users and orders, persisted remotely when possible and locally always
/// as a fallback.
#[derive(Debug)]
pub struct OrderStore {
    remote: Option<BackendClient>,
    storage: JsonFileStorage,
    local: Mutex<LocalState>,
}

#[derive(Debug, Default)]
struct LocalState {
    users: Vec<User>,
    orders: Vec<Order>,
}

impl OrderStore {
    /// Build the store, loading the local mirror from `storage`.
    ///
    /// `backend` is only used when `availability` is online.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the stored lists cannot be read.
    pub async fn open(
        storage: JsonFileStorage,
        backend: Option<BackendClient>,
        availability: Availability,
    ) -> Result<Self, StoreError> {
        let users = storage.read_list(USERS_KEY).await?;
        let orders = storage.read_list(ORDERS_KEY).await?;

        let remote = backend.filter(|_| availability.is_online());
        info!(
            users = users.len(),
            orders = orders.len(),
            remote = remote.is_some(),
            "Order store loaded"
        );

        Ok(Self {
            remote,
            storage,
            local: Mutex::new(LocalState { users, orders }),
        })
    }

    /// Whether operations try the remote API first.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        if self.remote.is_some() {
            Availability::Online
        } else {
            Availability::Offline
        }
    }

    /// Register a user, or return the existing one with the same email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the local mirror cannot be written.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn register_user(&self, new: NewUser) -> Result<User, StoreError> {
        if let Some(existing) = self.find_user_by_email(&new.email).await {
            return Ok(existing);
        }

        if let Some(remote) = &self.remote
            && let Some(user) = fallback("create_user", remote.create_user(&new).await)
        {
            info!(user_id = %user.id, "User created remotely");
            return Ok(user);
        }

        let mut local = self.local.lock().await;
        if let Some(existing) = local.users.iter().find(|u| u.email == new.email) {
            return Ok(existing.clone());
        }

        let user = User::from_new(UserId::new(local_id()), new, Utc::now());
        local.users.push(user.clone());
        if let Err(e) = self.storage.write_list(USERS_KEY, &local.users).await {
            local.users.pop();
            return Err(e);
        }

        info!(user_id = %user.id, "User created locally");
        Ok(user)
    }

    /// Find a user by their (normalised) email.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn find_user_by_email(&self, email: &Email) -> Option<User> {
        if let Some(remote) = &self.remote {
            let outcome = remote
                .list_users()
                .await
                .map(|users| users.into_iter().find(|u| &u.email == email));
            if let Some(found) = fallback("list_users", outcome) {
                return found;
            }
        }

        self.local
            .lock()
            .await
            .users
            .iter()
            .find(|u| &u.email == email)
            .cloned()
    }

    /// Persist a new order.
    ///
    /// Orders accepted by the API are also mirrored locally.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the order had to be stored locally and the
    /// local mirror cannot be written.
    #[instrument(skip(self, new), fields(user_id = %new.user_id, total = %new.totals.total))]
    pub async fn create_order(&self, new: NewOrder) -> Result<Order, StoreError> {
        if let Some(remote) = &self.remote
            && let Some(order) = fallback("create_order", remote.create_order(&new).await)
        {
            info!(order_id = %order.id, "Order created remotely");
            if let Err(e) = self.mirror_order(order.clone()).await {
                warn!(order_id = %order.id, error = %e, "Failed to mirror remote order locally");
            }
            return Ok(order);
        }

        let mut local = self.local.lock().await;
        let order = Order::from_new(OrderId::new(local_id()), new, Utc::now());
        local.orders.push(order.clone());
        if let Err(e) = self.storage.write_list(ORDERS_KEY, &local.orders).await {
            local.orders.pop();
            return Err(e);
        }

        info!(order_id = %order.id, "Order created locally");
        Ok(order)
    }

    /// Orders placed by one user.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_orders_by_user(&self, user_id: &UserId) -> Vec<Order> {
        if let Some(remote) = &self.remote
            && let Some(orders) = fallback("list_orders", remote.list_orders(user_id).await)
        {
            return orders;
        }

        self.local
            .lock()
            .await
            .orders
            .iter()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Snapshot of the locally known users.
    pub async fn users(&self) -> Vec<User> {
        self.local.lock().await.users.clone()
    }

    /// Snapshot of the locally known orders.
    pub async fn orders(&self) -> Vec<Order> {
        self.local.lock().await.orders.clone()
    }

    /// Insert or replace `order` in the local mirror.
    async fn mirror_order(&self, order: Order) -> Result<(), StoreError> {
        let mut local = self.local.lock().await;
        match local.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => local.orders.push(order),
        }
        self.storage.write_list(ORDERS_KEY, &local.orders).await
    }
}

/// Fallback policy: keep successes, log everything else.
fn fallback<T>(operation: &'static str, outcome: RemoteOutcome<T>) -> Option<T> {
    match outcome {
        RemoteOutcome::Success(value) => Some(value),
        RemoteOutcome::Rejected { status, message } => {
            warn!(
                operation,
                status,
                reason = %message,
                "Orders API rejected request, using local store"
            );
            None
        }
        RemoteOutcome::Unavailable(reason) => {
            info!(operation, reason = %reason, "Orders API unavailable, using local store");
            None
        }
    }
}

/// Timestamp-derived ID for records created locally.
fn local_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("local-{}-{suffix}", Utc::now().timestamp_millis())
}
