//! Remote orders API client.
//!
//! # Endpoints
//!
//! ```text
//! GET  /health               - Reachability check (see [`probe`])
//! GET  /users                - All users
//! POST /users                - Create a user
//! GET  /orders?userId={id}   - Orders of one user
//! POST /orders               - Create an order
//! ```
//!
//! Every response body is a JSON envelope:
//!
//! ```json
//! { "success": true, "data": { ... }, "message": null }
//! ```
//!
//! The nested object may also be keyed `user`, `users`, `order`, or
//! `orders`.
//!
//! Calls never return `Err` to the store. Each one resolves to a
//! [`RemoteOutcome`] and the store decides what to do with failures.

mod probe;

pub use probe::{Availability, probe};

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use tienda_core::UserId;

use crate::config::OrdersApiConfig;
use crate::models::{NewOrder, NewUser, Order, User};

/// Result of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome<T> {
    /// The API answered with a successful envelope.
    Success(T),
    /// The API could not be reached or answered with something unreadable.
    Unavailable(String),
    /// The API answered but refused the request.
    Rejected {
        /// HTTP status of the response.
        status: u16,
        /// Message from the envelope or the raw body.
        message: String,
    },
}

impl<T> RemoteOutcome<T> {
    /// Returns the value on success.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Unavailable(_) | Self::Rejected { .. } => None,
        }
    }

    /// Maps the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteOutcome<U> {
        match self {
            Self::Success(value) => RemoteOutcome::Success(f(value)),
            Self::Unavailable(reason) => RemoteOutcome::Unavailable(reason),
            Self::Rejected { status, message } => RemoteOutcome::Rejected { status, message },
        }
    }
}

/// Errors that can occur while executing a request.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Envelope had `success: false`.
    #[error("API refused request: {0}")]
    Refused(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl<T> From<Result<T, BackendError>> for RemoteOutcome<T> {
    fn from(result: Result<T, BackendError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(BackendError::Api { status, message }) => Self::Rejected { status, message },
            Err(BackendError::Refused(message)) => Self::Rejected {
                status: 200,
                message,
            },
            Err(e @ (BackendError::Http(_) | BackendError::Parse(_))) => {
                Self::Unavailable(e.to_string())
            }
        }
    }
}

/// Response envelope used by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(alias = "user", alias = "users", alias = "order", alias = "orders")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the remote orders API.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
    probe_timeout: Duration,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new client for the configured API.
    #[must_use]
    pub fn new(config: &OrdersApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            token: config.token.clone(),
            probe_timeout: config.probe_timeout,
        }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Run the start-up reachability check against `/health`.
    pub async fn probe(&self) -> Availability {
        probe(&self.client, &self.endpoint("health"), self.probe_timeout).await
    }

    /// Fetch every user.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> RemoteOutcome<Vec<User>> {
        let request = self.client.get(self.endpoint("users"));
        self.execute(request).await.into()
    }

    /// Create a user; the API assigns the ID.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &NewUser) -> RemoteOutcome<User> {
        let request = self.client.post(self.endpoint("users")).json(user);
        self.execute(request).await.into()
    }

    /// Fetch the orders of one user.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_orders(&self, user_id: &UserId) -> RemoteOutcome<Vec<Order>> {
        let url = format!(
            "{}?userId={}",
            self.endpoint("orders"),
            urlencoding::encode(user_id.as_str())
        );
        self.execute(self.client.get(url)).await.into()
    }

    /// Create an order; the API assigns the ID.
    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    pub async fn create_order(&self, order: &NewOrder) -> RemoteOutcome<Order> {
        let request = self.client.post(self.endpoint("orders")).json(order);
        self.execute(request).await.into()
    }

    /// Send a request and unwrap the response envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse orders API response"
            );
            BackendError::Parse(e.to_string())
        })?;

        if !envelope.success {
            return Err(BackendError::Refused(
                envelope
                    .message
                    .unwrap_or_else(|| "request not accepted".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| BackendError::Parse("envelope has no data".to_string()))
    }
}
