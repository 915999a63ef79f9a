use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use super::WatchTransport;
use super::WatchWorker;
use super::WatcherId;
use crate::Result;
use crate::TransportError;
use crate::WatchConfig;

/// Reply of a remote API call, as far as watching is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// The call succeeded without a result
    Empty,
    /// A notify watcher was created on the remote side
    NotifyWatcher { watcher_id: String },
}

/// Generic request/response caller of a remote API.
///
/// Calls are addressed by object type (the facade name), object id and
/// request name. How the call travels over the wire is up to the
/// implementation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ApiCaller: Send + Sync + 'static {
    async fn api_call(
        &self,
        object_type: &str,
        id: &str,
        request: &str,
    ) -> std::result::Result<ApiResponse, TransportError>;
}

/// Watch transport speaking the facade convention of the remote API:
/// `<Facade>.Watch` opens a notify watcher, `<Facade>Watcher.Next` and
/// `<Facade>Watcher.Stop` operate on it.
#[derive(Debug)]
pub struct FacadeWatchTransport<C: ?Sized> {
    facade: String,
    watcher_type: String,
    caller: Arc<C>,
}

impl<C> FacadeWatchTransport<C>
where
    C: ApiCaller + ?Sized,
{
    pub fn new(
        facade: impl Into<String>,
        caller: Arc<C>,
    ) -> Self {
        let facade = facade.into();
        let watcher_type = format!("{}Watcher", facade);
        Self {
            facade,
            watcher_type,
            caller,
        }
    }

    pub fn facade(&self) -> &str {
        &self.facade
    }
}

#[async_trait]
impl<C> WatchTransport for FacadeWatchTransport<C>
where
    C: ApiCaller + ?Sized,
{
    async fn open(&self) -> std::result::Result<WatcherId, TransportError> {
        match self.caller.api_call(&self.facade, "", "Watch").await? {
            ApiResponse::NotifyWatcher { watcher_id } if !watcher_id.is_empty() => {
                debug!(facade = %self.facade, watcher_id = %watcher_id, "notify watcher created");
                Ok(WatcherId::new(watcher_id))
            }
            _ => Err(TransportError::Remote(format!(
                "{}.Watch returned no watcher id",
                self.facade
            ))),
        }
    }

    async fn next(
        &self,
        id: &WatcherId,
    ) -> std::result::Result<(), TransportError> {
        self.caller
            .api_call(&self.watcher_type, id.as_str(), "Next")
            .await
            .map(|_| ())
    }

    async fn stop(
        &self,
        id: &WatcherId,
    ) -> std::result::Result<(), TransportError> {
        self.caller
            .api_call(&self.watcher_type, id.as_str(), "Stop")
            .await
            .map(|_| ())
    }
}

/// Client of a single facade that hands out watch workers
#[derive(Debug)]
pub struct WatchClient<C: ?Sized> {
    transport: Arc<FacadeWatchTransport<C>>,
    config: WatchConfig,
}

impl<C> WatchClient<C>
where
    C: ApiCaller + ?Sized,
{
    pub fn new(
        facade: impl Into<String>,
        caller: Arc<C>,
        config: WatchConfig,
    ) -> Self {
        Self {
            transport: Arc::new(FacadeWatchTransport::new(facade, caller)),
            config,
        }
    }

    /// Opens a watch on the facade. See [`WatchWorker::start`].
    pub async fn watch(&self) -> Result<WatchWorker> {
        WatchWorker::start(self.transport.clone(), &self.config).await
    }
}
