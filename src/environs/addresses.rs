use tracing::debug;
use tracing::trace;

use super::Instance;
use super::InstanceId;
use super::InstanceProvider;
use crate::Address;
use crate::AttemptStrategy;
use crate::LookupError;
use crate::ResolveError;
use crate::Result;

/// Concatenates the addresses of the given instances, in order.
///
/// Missing instances and instances without addresses contribute nothing.
/// Duplicates are kept.
pub fn collect_addresses(instances: &[Option<Instance>]) -> Vec<Address> {
    instances
        .iter()
        .flatten()
        .flat_map(|inst| inst.addresses.iter().cloned())
        .collect()
}

/// Waits for at least one of the instances to report addresses, and returns
/// all addresses reported on that attempt.
///
/// A [`LookupError::Partial`] answer counts as an attempt without addresses.
/// Any other lookup error ends the wait immediately. When the strategy runs
/// out without a single address the error names the requested ids.
pub async fn resolve_addresses<P>(
    provider: &P,
    ids: &[InstanceId],
    strategy: &AttemptStrategy,
) -> Result<Vec<Address>>
where
    P: InstanceProvider + ?Sized,
{
    let mut attempt = strategy.start();
    while attempt.next().await {
        let instances = match provider.instances(ids).await {
            Ok(instances) => instances,
            Err(LookupError::Partial(instances)) => instances,
            Err(e) => {
                debug!("error getting state instances: {}", e);
                return Err(ResolveError::Lookup(e).into());
            }
        };

        let addrs = collect_addresses(&instances);
        if !addrs.is_empty() {
            debug!(attempts = attempt.count(), "instance addresses resolved: {:?}", addrs);
            return Ok(addrs);
        }
        trace!(attempts = attempt.count(), "no addresses for {:?} yet", ids);
    }

    Err(ResolveError::AddressesNotFound { ids: ids.to_vec() }.into())
}
