use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::LONG_ATTEMPT;
use crate::ApiCaller;
use crate::ApiResponse;
use crate::TransportError;
use crate::WatchTransport;
use crate::WatcherId;

/// A call recorded by a stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub method: String,
    pub args: Vec<String>,
}

impl StubCall {
    pub fn new(
        method: &str,
        args: &[&str],
    ) -> Self {
        Self {
            method: method.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Ordered log of stub calls
#[derive(Debug, Default)]
pub struct Stub {
    calls: Mutex<Vec<StubCall>>,
}

impl Stub {
    pub fn add_call(
        &self,
        method: &str,
        args: &[&str],
    ) {
        self.calls.lock().push(StubCall::new(method, args));
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().clone()
    }

    /// Polls until at least `n` calls were recorded, then returns them all
    pub async fn wait_for_calls(
        &self,
        n: usize,
    ) -> Vec<StubCall> {
        let mut attempt = LONG_ATTEMPT.start();
        while attempt.next().await {
            if self.calls.lock().len() >= n {
                break;
            }
        }
        self.calls()
    }
}

/// Recording watch transport.
///
/// `next` blocks until a result is pushed with [`StubTransport::push_next`].
#[derive(Debug)]
pub struct StubTransport {
    pub stub: Stub,
    watcher_id: String,
    open_error: Option<TransportError>,
    stop_error: Option<TransportError>,
    next_tx: mpsc::UnboundedSender<Result<(), TransportError>>,
    next_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Result<(), TransportError>>>,
}

impl StubTransport {
    pub fn new(watcher_id: &str) -> Self {
        let (next_tx, next_rx) = mpsc::unbounded_channel();
        Self {
            stub: Stub::default(),
            watcher_id: watcher_id.to_string(),
            open_error: None,
            stop_error: None,
            next_tx,
            next_rx: tokio::sync::Mutex::new(next_rx),
        }
    }

    pub fn with_open_error(
        mut self,
        e: TransportError,
    ) -> Self {
        self.open_error = Some(e);
        self
    }

    pub fn with_stop_error(
        mut self,
        e: TransportError,
    ) -> Self {
        self.stop_error = Some(e);
        self
    }

    /// Queues the result of a future `next` call
    pub fn push_next(
        &self,
        result: Result<(), TransportError>,
    ) {
        let _ = self.next_tx.send(result);
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.stub.calls()
    }

    pub fn count(
        &self,
        method: &str,
    ) -> usize {
        self.stub.calls().iter().filter(|c| c.method == method).count()
    }
}

#[async_trait]
impl WatchTransport for StubTransport {
    async fn open(&self) -> Result<WatcherId, TransportError> {
        self.stub.add_call("open", &[]);
        match &self.open_error {
            Some(e) => Err(e.clone()),
            None => Ok(WatcherId::new(self.watcher_id.clone())),
        }
    }

    async fn next(
        &self,
        id: &WatcherId,
    ) -> Result<(), TransportError> {
        self.stub.add_call("next", &[id.as_str()]);
        let mut rx = self.next_rx.lock().await;
        match rx.recv().await {
            Some(result) => result,
            None => Err(TransportError::Remote("stub closed".to_string())),
        }
    }

    async fn stop(
        &self,
        id: &WatcherId,
    ) -> Result<(), TransportError> {
        self.stub.add_call("stop", &[id.as_str()]);
        match &self.stop_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

type CallFn = dyn Fn(&str, &str, &str) -> Result<ApiResponse, TransportError> + Send + Sync;

/// Remote API caller answering every call with a closure
pub struct ApiCallerFunc(Box<CallFn>);

impl ApiCallerFunc {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str, &str) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }
}

#[async_trait]
impl ApiCaller for ApiCallerFunc {
    async fn api_call(
        &self,
        object_type: &str,
        id: &str,
        request: &str,
    ) -> Result<ApiResponse, TransportError> {
        (self.0)(object_type, id, request)
    }
}
