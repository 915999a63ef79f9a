use std::fmt;

use tracing::debug;

use super::resolve_addresses;
use super::Environ;
use crate::addresses_with_port;
use crate::constants::ADDRESSES_REFRESH_ATTEMPT;
use crate::constants::ENVIRON_TAG_PREFIX;
use crate::host_ports_to_strings;
use crate::AttemptStrategy;
use crate::EnvironConfigError;
use crate::Result;

/// Identity token of a cluster, derived from its UUID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvironTag(String);

impl EnvironTag {
    pub fn new(uuid: &str) -> Self {
        Self(format!("{}{}", ENVIRON_TAG_PREFIX, uuid))
    }

    pub fn uuid(&self) -> &str {
        &self.0[ENVIRON_TAG_PREFIX.len()..]
    }
}

impl fmt::Display for EnvironTag {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to connect to the control-plane API of a cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// `host:port` strings, in resolution order
    pub addrs: Vec<String>,
    /// CA certificate the API server certificate is signed with
    pub ca_cert: Vec<u8>,
    pub environ_tag: EnvironTag,
}

/// Locates the control-plane API of the environ using the default addresses
/// refresh strategy.
pub async fn locate_endpoint<E>(env: &E) -> Result<EndpointDescriptor>
where
    E: Environ + ?Sized,
{
    locate_endpoint_with(env, &ADDRESSES_REFRESH_ATTEMPT).await
}

/// Locates the control-plane API of the environ.
///
/// The configuration is checked before any lookup: a missing CA certificate
/// or UUID fails the call without spending the attempt budget. Errors from
/// the environ and from address resolution are returned as they are.
pub async fn locate_endpoint_with<E>(
    env: &E,
    strategy: &AttemptStrategy,
) -> Result<EndpointDescriptor>
where
    E: Environ + ?Sized,
{
    let config = env.config();
    let ca_cert = config.ca_cert().ok_or(EnvironConfigError::MissingCaCert)?.to_vec();
    let uuid = config.uuid().ok_or(EnvironConfigError::MissingUuid)?;

    let instance_ids = env.state_server_instances().await?;
    debug!("state_server_instances returned: {:?}", instance_ids);

    let addrs = resolve_addresses(env, &instance_ids, strategy).await?;
    let api_addrs = host_ports_to_strings(&addresses_with_port(&addrs, config.api_port()));

    Ok(EndpointDescriptor {
        addrs: api_addrs,
        ca_cert,
        environ_tag: EnvironTag::new(uuid),
    })
}
