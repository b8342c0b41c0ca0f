//! SinkHandle - manages a sink behind a request channel and worker task
//!
//! Type-erases a concrete `RecordSink` so the dispatcher can hold an
//! arbitrary mix of sinks. The worker spawns one sub-task per request, so
//! sends stay concurrent; each outcome travels back on a oneshot.

use std::sync::Arc;

use contracts::{ContractError, RecordSink, SinkRole};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

struct SendRequest {
    payload: String,
    reply: oneshot::Sender<Result<bool, ContractError>>,
}

/// Handle to a running sink worker.
pub struct SinkHandle {
    role: SinkRole,
    tx: mpsc::Sender<SendRequest>,
    stop: oneshot::Sender<()>,
    worker: JoinHandle<()>,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task.
    pub fn spawn<S>(sink: S, queue_capacity: usize) -> Self
    where
        S: RecordSink + Send + Sync + 'static,
    {
        let role = sink.role();
        let (tx, rx) = mpsc::channel(queue_capacity);
        let (stop, stop_rx) = oneshot::channel();
        let worker = tokio::spawn(sink_worker(sink, rx, stop_rx));

        Self {
            role,
            tx,
            stop,
            worker,
        }
    }

    /// Role this handle serves.
    pub fn role(&self) -> SinkRole {
        self.role
    }

    /// Cheap clonable client for dispatch tasks.
    pub fn client(&self) -> SinkClient {
        SinkClient {
            role: self.role,
            tx: self.tx.clone(),
        }
    }

    /// Shut the worker down.
    ///
    /// Requests still queued are dropped and their clients observe
    /// `SinkClosed`; sends already in flight resolve on their own. The
    /// dispatcher drains its dispatch tasks before calling this, so under a
    /// clean drain nothing is lost.
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.role))]
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        drop(self.tx);
        if let Err(e) = self.worker.await {
            error!(sink = %self.role, error = ?e, "sink worker panicked");
        }
        debug!(sink = %self.role, "sink handle shutdown complete");
    }
}

/// Clonable request sender for one sink.
#[derive(Clone)]
pub struct SinkClient {
    role: SinkRole,
    tx: mpsc::Sender<SendRequest>,
}

impl SinkClient {
    /// Role of the sink behind this client.
    pub fn role(&self) -> SinkRole {
        self.role
    }

    /// Submit one payload and await its outcome.
    ///
    /// # Errors
    /// Returns `SinkClosed` when the worker is gone; the dispatcher treats
    /// that as a soft failure like any other send error.
    pub async fn send(&self, payload: String) -> Result<bool, ContractError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SendRequest {
                payload,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ContractError::SinkClosed { role: self.role })?;
        reply_rx
            .await
            .map_err(|_| ContractError::SinkClosed { role: self.role })?
    }
}

/// Worker loop: accepts requests and spawns one delivery task per request,
/// so a slow send never blocks the next one.
async fn sink_worker<S>(
    sink: S,
    mut rx: mpsc::Receiver<SendRequest>,
    mut stop: oneshot::Receiver<()>,
) where
    S: RecordSink + Send + Sync + 'static,
{
    let role = sink.role();
    let sink = Arc::new(sink);
    debug!(sink = %role, "sink worker started");

    loop {
        tokio::select! {
            _ = &mut stop => break,
            request = rx.recv() => {
                let Some(request) = request else { break };
                let sink = Arc::clone(&sink);
                tokio::spawn(async move {
                    let outcome = sink.send(&request.payload).await;
                    // A dropped reply means the dispatch task was abandoned
                    // at shutdown; the outcome is simply discarded
                    let _ = request.reply.send(outcome);
                });
            }
        }
    }

    debug!(sink = %role, "sink worker stopped");
}
