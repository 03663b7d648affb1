//! Client for long-running cluster admin tasks.
//!
//! # Architecture
//!
//! The crate is organized around an explicit capability seam:
//!
//! - [`ControlApi`] - the two calls a cluster control plane must expose
//!   (post an admin request, report node health)
//! - [`HttpControlApi`] - reqwest-backed implementation of that seam
//! - [`TaskWaiter`] - submits an admin mutation, then polls the task the
//!   control plane assigned until it reaches a terminal status
//! - [`ops`] - the concrete operations built on the waiter (backup,
//!   restore, restore-completion polling)
//!
//! Passing the capability in (rather than consulting a process-global
//! cluster handle) keeps the waiter testable against scripted fakes and
//! lets independent waiters poll independent clusters concurrently.
//!
//! # Failure semantics
//!
//! Transport failures, malformed responses, and responses carrying a
//! non-empty error list all surface immediately as [`AdminError`] - none
//! of them is retried. Only the "task not yet terminal" condition loops,
//! on a fixed interval, optionally bounded by a caller deadline
//! ([`WaitError::DeadlineExceeded`]).

mod api;
mod error;
mod http;
pub mod ops;
mod waiter;

pub use api::{ControlApi, run_admin};
pub use error::{AdminError, WaitError};
pub use http::{HttpControlApi, HttpControlApiBuilder};
pub use waiter::{DEFAULT_POLL_INTERVAL, TaskWaiter};

pub use taskwatch_types as types;

use std::sync::OnceLock;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Process-wide HTTP client with conservative transport settings.
///
/// Control endpoints are commonly plain-HTTP on a private network, so TLS
/// is not forced here; pass a hardened client through
/// [`HttpControlApiBuilder::client`] when talking across trust boundaries.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!("failed to build shared HTTP client: {e}; falling back to defaults");
            reqwest::Client::new()
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Shared client with a per-request timeout applied on top of the base
/// transport settings.
pub fn http_client_with_timeout(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder().timeout(timeout).build()
}
