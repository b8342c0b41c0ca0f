//! RecordSource trait - record producer abstraction
//!
//! Defines a unified interface for record producers, decoupling the
//! dispatcher from how records come into existence. File readers and the
//! mock source implement this trait.

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{IngestionError, RecordQueue};

/// Record producer trait
///
/// A source pushes records onto the queue until its input is exhausted, then
/// returns. Termination is not signalled in-band; the consumer detects
/// end-of-input via queue idleness (shortened by the close the spawn wrapper
/// performs).
#[trait_variant::make(RecordSource: Send)]
pub trait LocalRecordSource {
    /// Descriptive name (used for logging)
    fn name(&self) -> &str;

    /// Push every record onto the queue; returns the number produced.
    ///
    /// # Errors
    /// Returns a read error; records produced before the error stay queued.
    async fn produce(self, queue: RecordQueue) -> Result<u64, IngestionError>;
}

/// Spawn a source as a background task.
///
/// The queue is closed when the source finishes (or fails), so a clean drain
/// does not have to wait out the consumer's full idle timeout. Meant for the
/// single-source topology; with several producers the close would have to
/// move to whoever owns the last one.
pub fn spawn_source<S>(source: S, queue: RecordQueue) -> JoinHandle<()>
where
    S: RecordSource + Send + 'static,
{
    tokio::spawn(async move {
        let name = source.name().to_string();
        match source.produce(queue.clone()).await {
            Ok(count) => info!(source = %name, records = count, "record source finished"),
            Err(e) => error!(source = %name, error = %e, "record source failed"),
        }
        queue.close();
    })
}
