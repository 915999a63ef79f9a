//! Environs: the instances the orchestrator provisioned, and how to reach
//! the control plane running on them.
//!
//! Instance state is eventually consistent. A freshly started instance is
//! known to the provider well before it reports a network address, so the
//! resolution helpers here poll within a bounded [`AttemptStrategy`] instead
//! of failing on the first empty answer.
//!
//! [`AttemptStrategy`]: crate::AttemptStrategy
mod addresses;
mod endpoint;
mod local;

pub use addresses::*;
pub use endpoint::*;
pub use local::*;


use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;

use crate::Address;
use crate::LookupError;
use crate::Result;

/// Provider assigned instance identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Pending,
    Running,
    ShuttingDown,
    Stopped,
    Terminated,
}

impl InstanceStatus {
    /// Whether an instance in this status counts as existing for lookups
    pub fn is_alive(&self) -> bool {
        matches!(self, InstanceStatus::Pending | InstanceStatus::Running)
    }
}

/// Snapshot of an instance as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub status: InstanceStatus,
    /// Addresses reported so far, possibly none yet
    pub addresses: Vec<Address>,
}

/// What to start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSpec {
    /// Whether the instance will host control-plane services
    pub state_server: bool,
}

/// Minimal capability of a cloud provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InstanceProvider: Send + Sync + 'static {
    /// Looks up instances by id.
    ///
    /// The result is aligned with `ids`. When every id is found the result is
    /// `Ok`. When only some are found the result is
    /// [`LookupError::Partial`], holding `None` for each missing id. When none
    /// are found the result is [`LookupError::NoInstances`].
    async fn instances(
        &self,
        ids: &[InstanceId],
    ) -> std::result::Result<Vec<Option<Instance>>, LookupError>;

    async fn start_instance(
        &self,
        spec: InstanceSpec,
    ) -> Result<Instance>;

    async fn stop_instances(
        &self,
        ids: &[InstanceId],
    ) -> Result<()>;
}

/// An environ knows which instances host the control plane and how the
/// cluster is configured.
#[async_trait]
pub trait Environ: InstanceProvider {
    /// Instances currently hosting control-plane services
    async fn state_server_instances(&self) -> Result<Vec<InstanceId>>;

    /// Current cluster configuration. Read-only from the caller's side.
    fn config(&self) -> EnvironConfig;
}

/// Cluster configuration consulted when locating the control-plane API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironConfig {
    pub ca_cert: Option<Vec<u8>>,
    pub api_port: u16,
    pub uuid: Option<String>,
}

impl EnvironConfig {
    pub fn ca_cert(&self) -> Option<&[u8]> {
        self.ca_cert.as_deref()
    }

    pub fn api_port(&self) -> u16 {
        self.api_port
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }
}
