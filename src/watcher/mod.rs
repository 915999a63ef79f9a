//! Remote watch bridging
//!
//! A remote API exposes change notification as a request/response protocol:
//! open a watch session, poll it for the next change, stop it. This module
//! turns such a session into a local [`WatchWorker`]: a background task that
//! owns the session, publishes every change on a channel and closes the
//! remote session exactly once, however the worker terminates.
//!
//! ```text
//! start() ── open ──▶ Running ── next ─┬─ Ok  ──▶ publish change, loop
//!                                      └─ Err ──▶ Terminating ── stop ──▶ Dead(err)
//! stop()  ── advisory signal, checked before every next
//! wait()  ── resolves once Dead, with the terminal error
//! ```
mod facade;
mod worker;

pub use facade::*;
pub use worker::*;


use std::fmt;

#[cfg(test)]
use mockall::automock;
use async_trait::async_trait;

use crate::TransportError;

/// Opaque handle of a remote watch session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatcherId(String);

impl WatcherId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WatcherId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Polling change notification protocol exposed by a remote API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WatchTransport: Send + Sync + 'static {
    /// Starts a watch session.
    ///
    /// Must not start any background activity.
    async fn open(&self) -> std::result::Result<WatcherId, TransportError>;

    /// Blocks until the next change is available.
    ///
    /// An error means the session is no longer usable, whether the remote
    /// side stopped it deliberately or the transport failed.
    async fn next(
        &self,
        id: &WatcherId,
    ) -> std::result::Result<(), TransportError>;

    /// Closes the session. Idempotent, and allowed after the session failed.
    async fn stop(
        &self,
        id: &WatcherId,
    ) -> std::result::Result<(), TransportError>;
}

/// Lifecycle of a [`WatchWorker`]. Transitions only move forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Running,
    Terminating,
    /// Terminal state. Carries the session error, `None` after a clean stop.
    Dead(Option<TransportError>),
}

impl WorkerState {
    pub fn is_dead(&self) -> bool {
        matches!(self, WorkerState::Dead(_))
    }
}
