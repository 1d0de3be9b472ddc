//! # Blocking and Callback Adapters
//!
//! The async [`Client`] is the only implementation of each operation. Sync
//! callers drive any of its futures through [`BlockingClient::run`];
//! callers that prefer callbacks hand a future to [`spawn_with_callback`].

use std::future::Future;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::client::Client;
use crate::errors::ClientError;

/// A [`Client`] bundled with its own runtime.
///
/// Background work such as topic subscriptions keeps running on the
/// runtime's worker thread between calls to [`run`](Self::run).
pub struct BlockingClient {
    client: Client,
    runtime: Runtime,
}

impl BlockingClient {
    pub fn new(client: Client) -> Result<Self, ClientError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ledger-client")
            .enable_all()
            .build()
            .map_err(|e| ClientError::Runtime(e.to_string()))?;
        Ok(Self { client, runtime })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Handle to the runtime, for [`spawn_with_callback`] via
    /// [`Handle::enter`].
    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    /// Block the current thread until `future` completes.
    ///
    /// Panics if called from inside an async context.
    pub fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Run `future` in the background and report its outcome to exactly one of
/// the two callbacks. Must be called inside a Tokio runtime.
pub fn spawn_with_callback<F, T, E, OnOk, OnErr>(
    future: F,
    on_ok: OnOk,
    on_err: OnErr,
) -> JoinHandle<()>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    OnOk: FnOnce(T) + Send + 'static,
    OnErr: FnOnce(E) + Send + 'static,
{
    tokio::spawn(async move {
        match future.await {
            Ok(value) => on_ok(value),
            Err(error) => on_err(error),
        }
    })
}
