use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use crate::Address;
use crate::Environ;
use crate::EnvironConfig;
use crate::Error;
use crate::Instance;
use crate::InstanceId;
use crate::InstanceProvider;
use crate::InstanceSpec;
use crate::InstanceStatus;
use crate::LookupError;
use crate::Result;

pub const TEST_CA_CERT: &[u8] = b"-----BEGIN CERTIFICATE-----\ntest\n-----END CERTIFICATE-----\n";
pub const TEST_UUID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
pub const TEST_API_PORT: u16 = 17070;

type LookupFn = dyn Fn(usize, &[InstanceId]) -> std::result::Result<Vec<Option<Instance>>, LookupError> + Send + Sync;

/// Environ whose instance lookups are answered by a script.
///
/// The script receives the zero-based index of the lookup call and the
/// requested ids.
pub struct StubEnviron {
    config: EnvironConfig,
    state_servers: Option<Vec<InstanceId>>,
    lookup: Box<LookupFn>,
    lookups: AtomicUsize,
}

impl StubEnviron {
    pub fn new(state_servers: &[&str]) -> Self {
        Self {
            config: test_environ_config(),
            state_servers: Some(ids(state_servers)),
            lookup: Box::new(|_, _| Err(LookupError::NoInstances)),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_lookup<F>(
        mut self,
        lookup: F,
    ) -> Self
    where
        F: Fn(usize, &[InstanceId]) -> std::result::Result<Vec<Option<Instance>>, LookupError>
            + Send
            + Sync
            + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    pub fn with_config(
        mut self,
        config: EnvironConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Makes `state_server_instances` fail
    pub fn without_state_servers(mut self) -> Self {
        self.state_servers = None;
        self
    }

    /// Number of instance lookups made so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstanceProvider for StubEnviron {
    async fn instances(
        &self,
        ids: &[InstanceId],
    ) -> std::result::Result<Vec<Option<Instance>>, LookupError> {
        let call = self.lookups.fetch_add(1, Ordering::SeqCst);
        (self.lookup)(call, ids)
    }

    async fn start_instance(
        &self,
        _spec: InstanceSpec,
    ) -> Result<Instance> {
        Err(Error::Fatal("start_instance is not supported by StubEnviron".to_string()))
    }

    async fn stop_instances(
        &self,
        _ids: &[InstanceId],
    ) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Environ for StubEnviron {
    async fn state_server_instances(&self) -> Result<Vec<InstanceId>> {
        self.state_servers
            .clone()
            .ok_or_else(|| Error::NotFound("state server instances".to_string()))
    }

    fn config(&self) -> EnvironConfig {
        self.config.clone()
    }
}

pub fn test_environ_config() -> EnvironConfig {
    EnvironConfig {
        ca_cert: Some(TEST_CA_CERT.to_vec()),
        api_port: TEST_API_PORT,
        uuid: Some(TEST_UUID.to_string()),
    }
}

pub fn ids(ids: &[&str]) -> Vec<InstanceId> {
    ids.iter().map(|id| InstanceId::new(*id)).collect()
}

/// Running instance reporting the given addresses
pub fn instance(
    id: &str,
    addrs: &[&str],
) -> Instance {
    Instance {
        id: InstanceId::new(id),
        status: InstanceStatus::Running,
        addresses: addrs.iter().map(|a| Address::new(*a)).collect(),
    }
}
