//! Start-up reachability check for the orders API.
//!
//! The check runs once, before the store is built. Its result is handed to
//! the store as a plain value; there is no periodic re-check, so an API that
//! comes back later is only picked up after a restart.

use std::time::Duration;

use tracing::{info, warn};

/// Whether the remote API was reachable at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    /// Health check answered 2xx within the timeout.
    Online,
    /// No API configured, or the health check failed.
    #[default]
    Offline,
}

impl Availability {
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Issue a bounded `GET url`.
///
/// Returns [`Availability::Online`] only for a 2xx response received within
/// `timeout`. Transport errors, non-success statuses, and timeouts all yield
/// [`Availability::Offline`].
pub async fn probe(client: &reqwest::Client, url: &str, timeout: Duration) -> Availability {
    match client.get(url).timeout(timeout).send().await {
        Ok(response) if response.status().is_success() => {
            info!(url, "Orders API reachable");
            Availability::Online
        }
        Ok(response) => {
            warn!(url, status = %response.status(), "Orders API health check failed");
            Availability::Offline
        }
        Err(e) if e.is_timeout() => {
            warn!(url, ?timeout, "Orders API health check timed out");
            Availability::Offline
        }
        Err(e) => {
            warn!(url, error = %e, "Orders API unreachable");
            Availability::Offline
        }
    }
}
