use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use dashmap::DashMap;
use nanoid::nanoid;
use parking_lot::RwLock;
use tracing::debug;
use tracing::info;

use super::Environ;
use super::EnvironConfig;
use super::Instance;
use super::InstanceId;
use super::InstanceProvider;
use super::InstanceSpec;
use super::InstanceStatus;
use crate::constants::LOCAL_INSTANCE_ID_PREFIX;
use crate::Address;
use crate::Error;
use crate::LookupError;
use crate::Result;

const ID_ALPHABET: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// In-memory environ.
///
/// Behaves like an eventually-consistent cloud: started instances are
/// `Pending` and report no addresses until [`LocalEnviron::set_addresses`]
/// is called. Instances that are shutting down, stopped or terminated stay
/// in the registry but are invisible to lookups.
#[derive(Debug)]
pub struct LocalEnviron {
    name: String,
    instances: DashMap<InstanceId, Instance>,
    state_servers: RwLock<Vec<InstanceId>>,
    config: ArcSwap<EnvironConfig>,
}

impl LocalEnviron {
    pub fn new(
        name: impl Into<String>,
        config: EnvironConfig,
    ) -> Self {
        Self {
            name: name.into(),
            instances: DashMap::new(),
            state_servers: RwLock::new(Vec::new()),
            config: ArcSwap::from_pointee(config),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_config(
        &self,
        config: EnvironConfig,
    ) {
        self.config.store(Arc::new(config));
    }

    /// Starts the first control-plane instance
    pub async fn bootstrap(&self) -> Result<Instance> {
        if !self.state_servers.read().is_empty() {
            return Err(Error::Fatal(format!("environ {} is already bootstrapped", self.name)));
        }
        let inst = self.start_instance(InstanceSpec { state_server: true }).await?;
        info!(environ = %self.name, instance = %inst.id, "environ bootstrapped");
        Ok(inst)
    }

    /// Adds an instance as-is, e.g. one left behind in a terminal state
    pub fn insert_instance(
        &self,
        instance: Instance,
    ) {
        self.instances.insert(instance.id.clone(), instance);
    }

    /// Records the addresses the provider now reports for an instance, which
    /// also marks it running.
    pub fn set_addresses(
        &self,
        id: &InstanceId,
        addresses: Vec<Address>,
    ) -> Result<()> {
        let mut inst = self
            .instances
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("instance {}", id)))?;
        inst.addresses = addresses;
        inst.status = InstanceStatus::Running;
        Ok(())
    }

    pub fn set_status(
        &self,
        id: &InstanceId,
        status: InstanceStatus,
    ) -> Result<()> {
        let mut inst = self
            .instances
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("instance {}", id)))?;
        inst.status = status;
        Ok(())
    }

    pub fn instance(
        &self,
        id: &InstanceId,
    ) -> Option<Instance> {
        self.instances.get(id).map(|inst| inst.clone())
    }

    fn new_instance_id(&self) -> InstanceId {
        loop {
            let id = InstanceId::new(format!("{}{}", LOCAL_INSTANCE_ID_PREFIX, nanoid!(8, &ID_ALPHABET)));
            if !self.instances.contains_key(&id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl InstanceProvider for LocalEnviron {
    async fn instances(
        &self,
        ids: &[InstanceId],
    ) -> std::result::Result<Vec<Option<Instance>>, LookupError> {
        let found: Vec<Option<Instance>> = ids
            .iter()
            .map(|id| {
                self.instances
                    .get(id)
                    .filter(|inst| inst.status.is_alive())
                    .map(|inst| inst.clone())
            })
            .collect();

        let count = found.iter().flatten().count();
        if count == 0 {
            return Err(LookupError::NoInstances);
        }
        if count < ids.len() {
            return Err(LookupError::Partial(found));
        }
        Ok(found)
    }

    async fn start_instance(
        &self,
        spec: InstanceSpec,
    ) -> Result<Instance> {
        let inst = Instance {
            id: self.new_instance_id(),
            status: InstanceStatus::Pending,
            addresses: vec![],
        };
        self.instances.insert(inst.id.clone(), inst.clone());
        if spec.state_server {
            self.state_servers.write().push(inst.id.clone());
        }
        debug!(environ = %self.name, instance = %inst.id, "instance started");
        Ok(inst)
    }

    async fn stop_instances(
        &self,
        ids: &[InstanceId],
    ) -> Result<()> {
        for id in ids {
            if let Some(mut inst) = self.instances.get_mut(id) {
                inst.status = InstanceStatus::Terminated;
                debug!(environ = %self.name, instance = %id, "instance terminated");
            }
        }
        self.state_servers.write().retain(|id| !ids.contains(id));
        Ok(())
    }
}

#[async_trait]
impl Environ for LocalEnviron {
    async fn state_server_instances(&self) -> Result<Vec<InstanceId>> {
        let ids = self.state_servers.read().clone();
        if ids.is_empty() {
            return Err(Error::NotFound("state server instances".to_string()));
        }
        Ok(ids)
    }

    fn config(&self) -> EnvironConfig {
        self.config.load().as_ref().clone()
    }
}
