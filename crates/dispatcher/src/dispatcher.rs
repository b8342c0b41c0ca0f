//! FanOutDispatcher - main loop coupling the record queue to the sinks.
//!
//! Drains the bounded queue, fans every record out to every sink as one
//! dispatch task per (record, sink), and drives the graceful drain at
//! end-of-input.

use std::sync::Arc;
use std::time::Duration;

use ingestion::RecordQueue;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::dispatch::{dispatch_record, DispatchContext};
use crate::handle::{SinkClient, SinkHandle};

/// Empty-queue observation window treated as end-of-input in streaming mode.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// Hard budget for outstanding dispatch tasks after queue drain.
pub const SHUTDOWN_BUDGET: Duration = Duration::from_secs(30);

/// How long to keep drawing from the queue.
#[derive(Debug, Clone, Copy)]
pub enum RunMode {
    /// Run until the queue has been empty for the poll timeout
    Streaming,
    /// Process at most this many records, then drain and stop
    Bounded(u64),
}

/// Outcome of one dispatcher run.
#[derive(Debug, Clone, Copy)]
pub struct DrainStats {
    /// Records drawn from the queue
    pub records: u64,
    /// Whether every dispatch task resolved inside the shutdown budget
    pub clean_drain: bool,
}

/// The dispatcher that fans records out to sinks.
pub struct FanOutDispatcher {
    handles: Vec<SinkHandle>,
    ctx: Arc<DispatchContext>,
}

impl FanOutDispatcher {
    /// Create a dispatcher over pre-built sink handles.
    pub fn new(handles: Vec<SinkHandle>, ctx: DispatchContext) -> Self {
        Self {
            handles,
            ctx: Arc::new(ctx),
        }
    }

    /// Shared dispatch context (metrics, dead-letter sink, transformers).
    pub fn context(&self) -> Arc<DispatchContext> {
        Arc::clone(&self.ctx)
    }

    /// Run the dispatcher until end-of-input, then drain.
    ///
    /// Each drawn record increments `processed` exactly once before fan-out.
    /// Completion order across sinks and records is unspecified; dispatch
    /// start order matches queue order.
    #[instrument(name = "dispatcher_run", skip(self, queue), fields(sinks = self.handles.len(), mode = ?mode))]
    pub async fn run(self, queue: RecordQueue, mode: RunMode) -> DrainStats {
        let Self { handles, ctx } = self;
        let clients: Vec<SinkClient> = handles.iter().map(SinkHandle::client).collect();
        let mut dispatches: JoinSet<()> = JoinSet::new();
        let mut records = 0u64;

        info!(sinks = handles.len(), "dispatcher started");

        loop {
            if let RunMode::Bounded(limit) = mode {
                if records >= limit {
                    info!(records, "record budget reached");
                    break;
                }
            }

            let Some(record) = queue.poll(POLL_TIMEOUT).await else {
                info!(records, "queue idle, stopping");
                break;
            };

            records += 1;
            ctx.metrics.inc_processed();

            for client in &clients {
                dispatches.spawn(dispatch_record(
                    Arc::clone(&ctx),
                    client.clone(),
                    record.clone(),
                ));
            }

            // Reap finished dispatch tasks so the set stays bounded
            while dispatches.try_join_next().is_some() {}

            if records.is_multiple_of(100) {
                debug!(records, in_flight = dispatches.len(), "dispatcher progress");
            }
        }

        drop(clients);

        let clean_drain = timeout(SHUTDOWN_BUDGET, async {
            while dispatches.join_next().await.is_some() {}
        })
        .await
        .is_ok();

        if !clean_drain {
            warn!(
                abandoned = dispatches.len(),
                "shutdown budget exceeded, abandoning outstanding dispatches"
            );
            dispatches.shutdown().await;
        }

        for handle in handles {
            handle.shutdown().await;
        }

        info!(records, clean_drain, "dispatcher shutdown complete");
        DrainStats {
            records,
            clean_drain,
        }
    }

    /// Spawn the dispatcher as a background task.
    pub fn spawn(self, queue: RecordQueue, mode: RunMode) -> JoinHandle<DrainStats> {
        tokio::spawn(async move { self.run(queue, mode).await })
    }
}
