#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use d_plane::TransportError;
use d_plane::WatchTransport;
use d_plane::WatcherId;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

pub const LONG_WAIT: Duration = Duration::from_secs(10);

pub const TEST_CA_CERT: &str = "-----BEGIN CERTIFICATE-----\nintegration\n-----END CERTIFICATE-----\n";
pub const TEST_UUID: &str = "6d1c9f52-5e3b-4b0b-9d54-3b5a3a1f0c77";

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

/// Remote watch session fed from the test through a channel.
///
/// Every `()` sent by the test is one change. Dropping the sender ends the
/// session with [`TransportError::WatcherStopped`].
pub struct ChannelTransport {
    watcher_id: String,
    changes: tokio::sync::Mutex<mpsc::Receiver<()>>,
    stopped: Mutex<Vec<String>>,
}

impl ChannelTransport {
    pub fn new(watcher_id: &str) -> (Arc<Self>, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel(16);
        let transport = Arc::new(Self {
            watcher_id: watcher_id.to_string(),
            changes: tokio::sync::Mutex::new(rx),
            stopped: Mutex::new(Vec::new()),
        });
        (transport, tx)
    }

    /// Ids of the sessions stopped so far
    pub fn stopped(&self) -> Vec<String> {
        self.stopped.lock().clone()
    }
}

#[async_trait]
impl WatchTransport for ChannelTransport {
    async fn open(&self) -> Result<WatcherId, TransportError> {
        Ok(WatcherId::new(self.watcher_id.clone()))
    }

    async fn next(
        &self,
        id: &WatcherId,
    ) -> Result<(), TransportError> {
        match self.changes.lock().await.recv().await {
            Some(()) => Ok(()),
            None => Err(TransportError::WatcherStopped(id.to_string())),
        }
    }

    async fn stop(
        &self,
        id: &WatcherId,
    ) -> Result<(), TransportError> {
        self.stopped.lock().push(id.to_string());
        Ok(())
    }
}
