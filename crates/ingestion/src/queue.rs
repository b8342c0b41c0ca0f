//! RecordQueue - bounded FIFO between producers and the dispatcher.

use std::time::Duration;

use async_channel::{bounded, Receiver, Sender};

use crate::IngestionError;

/// Fixed-capacity FIFO buffering raw records.
///
/// Multi-producer / multi-consumer safe; ordering is FIFO per producer.
/// Occupancy never exceeds the construction capacity: `put` suspends while
/// the queue is full, which is the backpressure mechanism for producers.
#[derive(Debug, Clone)]
pub struct RecordQueue {
    tx: Sender<String>,
    rx: Receiver<String>,
    capacity: usize,
}

impl RecordQueue {
    /// Create a queue with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Enqueue one record, suspending while the queue is full.
    ///
    /// # Errors
    /// Returns `QueueClosed` when the queue was closed.
    pub async fn put(&self, record: String) -> Result<(), IngestionError> {
        self.tx
            .send(record)
            .await
            .map_err(|_| IngestionError::QueueClosed)
    }

    /// Dequeue one record, suspending up to `timeout`.
    ///
    /// Returns `None` when no record arrived inside the timeout, or when the
    /// queue is closed and drained - either way the consumer treats it as
    /// end-of-input.
    pub async fn poll(&self, timeout: Duration) -> Option<String> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Ok(record)) => Some(record),
            Ok(Err(_)) => None,
            Err(_) => None,
        }
    }

    /// Close the queue. Buffered records stay pollable; once drained, `poll`
    /// returns `None` without waiting out the timeout.
    pub fn close(&self) {
        self.tx.close();
    }

    /// Current occupancy.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Construction capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
