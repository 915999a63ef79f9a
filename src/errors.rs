//! Control-plane error hierarchy
//!
//! Errors are grouped by the half of the crate that produces them: watch
//! bridging (transport and worker failures) and endpoint resolution
//! (instance lookup, address resolution and environ configuration).

use config::ConfigError;

use crate::Instance;
use crate::InstanceId;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Watch session and watch worker failures
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// Instance address resolution failures
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Environ configuration is missing required trust material or identity
    #[error(transparent)]
    Environ(#[from] EnvironConfigError),

    /// Configuration loading failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Operating system lookups, e.g. the current user
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

/// Error reported by a remote watch transport.
///
/// Cloneable so every observer of a dead worker receives the same value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Error message returned by the remote API
    #[error("{0}")]
    Remote(String),

    /// The remote API could not be reached
    #[error("Remote API unavailable: {0}")]
    Unavailable(String),

    /// The remote side has stopped the watcher
    #[error("watcher {0} has been stopped")]
    WatcherStopped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    /// Opening the watch session failed, no worker was started
    #[error(transparent)]
    Open(TransportError),

    /// The watch session failed while waiting for the next change
    #[error(transparent)]
    Session(TransportError),

    /// The worker task went away without reporting a terminal state
    #[error("Watch worker {0} exited without reporting its state")]
    WorkerLost(String),
}

impl WatchError {
    /// Returns the underlying transport error, if any
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            WatchError::Open(e) | WatchError::Session(e) => Some(e),
            WatchError::WorkerLost(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Some of the requested instances are not (yet) known to the provider.
    ///
    /// Carries the lookup result aligned with the requested ids, `None` for
    /// each missing instance. This is the only retryable lookup condition.
    #[error("some instance ids not found")]
    Partial(Vec<Option<Instance>>),

    /// None of the requested instances are known to the provider
    #[error("no instances found")]
    NoInstances,

    /// The provider API failed
    #[error("Instance provider failure: {0}")]
    Provider(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The attempt budget ran out before any instance reported an address
    #[error("addresses for {} not found", quoted_ids(.ids))]
    AddressesNotFound { ids: Vec<InstanceId> },

    /// Instance lookup failed with a non-retryable error
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvironConfigError {
    #[error("config has no CACert")]
    MissingCaCert,

    #[error("config has no UUID")]
    MissingUuid,
}

impl Error {
    /// Returns true if a higher-level control loop may simply try again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Resolve(ResolveError::AddressesNotFound { .. })
                | Error::Watch(WatchError::Session(TransportError::Unavailable(_)))
                | Error::Watch(WatchError::Open(TransportError::Unavailable(_)))
        )
    }

    /// Returns true if the error reports something that could not be found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::Resolve(ResolveError::AddressesNotFound { .. })
                | Error::Resolve(ResolveError::Lookup(LookupError::NoInstances))
        )
    }
}

fn quoted_ids(ids: &[InstanceId]) -> String {
    format!("{:?}", ids.iter().map(InstanceId::as_str).collect::<Vec<_>>())
}

impl From<LookupError> for Error {
    fn from(e: LookupError) -> Self {
        Error::Resolve(ResolveError::Lookup(e))
    }
}
