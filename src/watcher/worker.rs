use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::watch;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::WatchTransport;
use super::WatcherId;
use super::WorkerState;
use crate::Result;
use crate::TransportError;
use crate::WatchConfig;
use crate::WatchError;

/// Supervised background task bridging one remote watch session.
///
/// The worker owns the session handle exclusively. Every change delivered by
/// the transport is published on the changes channel; pending notifications
/// coalesce when the consumer lags behind.
///
/// Dropping the handle requests a stop, exactly like [`WatchWorker::stop`].
#[derive(Debug)]
pub struct WatchWorker {
    watcher_id: WatcherId,
    cancel: CancellationToken,
    state: watch::Receiver<WorkerState>,
    changes: Mutex<Option<mpsc::Receiver<()>>>,
}

impl WatchWorker {
    /// Opens a watch session and starts the worker task.
    ///
    /// When opening fails the error is returned directly and nothing is
    /// spawned.
    pub async fn start<T>(
        transport: Arc<T>,
        config: &WatchConfig,
    ) -> Result<Self>
    where
        T: WatchTransport + ?Sized,
    {
        let watcher_id = transport.open().await.map_err(WatchError::Open)?;
        debug!(watcher_id = %watcher_id, "watch session opened");

        let (state_tx, state_rx) = watch::channel(WorkerState::Created);
        let (changes_tx, changes_rx) = mpsc::channel(config.changes_buffer_size.max(1));
        let cancel = CancellationToken::new();

        state_tx.send_replace(WorkerState::Running);
        tokio::spawn(run(
            transport,
            watcher_id.clone(),
            cancel.clone(),
            changes_tx,
            state_tx,
        ));

        Ok(Self {
            watcher_id,
            cancel,
            state: state_rx,
            changes: Mutex::new(Some(changes_rx)),
        })
    }

    pub fn watcher_id(&self) -> &WatcherId {
        &self.watcher_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state.borrow().clone()
    }

    /// Hands out the change notification channel. Only the first call gets it.
    ///
    /// The channel closes once the worker is dead.
    pub fn take_changes(&self) -> Option<mpsc::Receiver<()>> {
        self.changes.lock().take()
    }

    /// Same as [`WatchWorker::take_changes`], as a `Stream`
    pub fn take_change_stream(&self) -> Option<ReceiverStream<()>> {
        self.take_changes().map(ReceiverStream::new)
    }

    /// Asks the worker to exit.
    ///
    /// Advisory only: an in-flight `next` is not interrupted, the worker exits
    /// once it returns. Repeated calls, and calls after death, do nothing.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            trace!(watcher_id = %self.watcher_id, "stop requested");
        }
        self.cancel.cancel();
    }

    /// Waits until the worker is dead and returns its terminal error.
    ///
    /// Any number of callers may wait; they all observe the same result. The
    /// remote `stop` call may still be in flight when this returns.
    pub async fn wait(&self) -> Result<()> {
        let mut state = self.state.clone();
        let dead = state
            .wait_for(WorkerState::is_dead)
            .await
            .map_err(|_| WatchError::WorkerLost(self.watcher_id.to_string()))?;
        let result = match &*dead {
            WorkerState::Dead(Some(e)) => Err(WatchError::Session(e.clone()).into()),
            _ => Ok(()),
        };
        result
    }

    /// Stops the worker and waits for it to die
    pub async fn stop_and_wait(&self) -> Result<()> {
        self.stop();
        self.wait().await
    }
}

impl Drop for WatchWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Stops every worker and waits for all of them, returning results in order
pub async fn stop_all(workers: &[WatchWorker]) -> Vec<Result<()>> {
    for worker in workers {
        worker.stop();
    }
    join_all(workers.iter().map(|w| w.wait())).await
}

async fn run<T>(
    transport: Arc<T>,
    watcher_id: WatcherId,
    cancel: CancellationToken,
    changes: mpsc::Sender<()>,
    state: watch::Sender<WorkerState>,
) where
    T: WatchTransport + ?Sized,
{
    let terminal = next_loop(transport.as_ref(), &watcher_id, &cancel, &changes).await;
    drop(changes);

    state.send_replace(WorkerState::Terminating);

    // Dead is reported without waiting for the remote stop to complete.
    let stop_id = watcher_id.clone();
    tokio::spawn(async move {
        if let Err(e) = transport.stop(&stop_id).await {
            warn!(watcher_id = %stop_id, "failed to stop watcher: {}", e);
        }
    });

    match &terminal {
        Some(e) => debug!(watcher_id = %watcher_id, "watcher died: {}", e),
        None => debug!(watcher_id = %watcher_id, "watcher stopped"),
    }
    state.send_replace(WorkerState::Dead(terminal));
}

async fn next_loop<T>(
    transport: &T,
    watcher_id: &WatcherId,
    cancel: &CancellationToken,
    changes: &mpsc::Sender<()>,
) -> Option<TransportError>
where
    T: WatchTransport + ?Sized,
{
    loop {
        if cancel.is_cancelled() {
            return None;
        }
        if let Err(e) = transport.next(watcher_id).await {
            return Some(e);
        }
        match changes.try_send(()) {
            Ok(()) => trace!(watcher_id = %watcher_id, "change published"),
            Err(TrySendError::Full(_)) => trace!(watcher_id = %watcher_id, "change coalesced"),
            Err(TrySendError::Closed(_)) => trace!(watcher_id = %watcher_id, "no change consumer"),
        }
    }
}
