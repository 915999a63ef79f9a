use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_API_PORT;
use crate::EnvironConfig;
use crate::Error;
use crate::Result;

/// Cluster settings read by the endpoint locator
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterConfig {
    /// Port the control-plane API listens on
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// PEM encoded CA certificate clients must trust
    #[serde(default)]
    pub ca_cert: Option<String>,

    /// UUID identifying the cluster
    #[serde(default)]
    pub uuid: Option<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            ca_cert: None,
            uuid: None,
        }
    }
}

impl ClusterConfig {
    /// Validates static settings.
    ///
    /// A missing CA certificate or UUID is not rejected here; the endpoint
    /// locator reports those when it needs them.
    pub fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            return Err(Error::InvalidConfig("cluster.api_port must be non-zero".into()));
        }
        if let Some(uuid) = &self.uuid {
            if uuid.trim().is_empty() {
                return Err(Error::InvalidConfig("cluster.uuid cannot be blank".into()));
            }
        }
        Ok(())
    }

    pub fn environ_config(&self) -> EnvironConfig {
        EnvironConfig {
            ca_cert: self.ca_cert.as_ref().map(|c| c.as_bytes().to_vec()),
            api_port: self.api_port,
            uuid: self.uuid.clone(),
        }
    }
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}
