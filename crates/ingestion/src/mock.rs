//! Mock record source
//!
//! For tests and demos without a file artifact.

use tracing::trace;

use crate::{IngestionError, RecordQueue, RecordSource};

/// In-memory source feeding a fixed set of records.
pub struct MockSource {
    name: String,
    records: Vec<String>,
}

impl MockSource {
    /// Create a source over the given records.
    pub fn new(records: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            records,
        }
    }

    /// Convenience: `count` small JSON objects `{"seq":<n>}`.
    pub fn sequential(count: usize) -> Self {
        Self::new((0..count).map(|n| format!("{{\"seq\":{n}}}")).collect())
    }
}

impl RecordSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(self, queue: RecordQueue) -> Result<u64, IngestionError> {
        let mut count = 0u64;
        for record in self.records {
            trace!(record = %record, "mock source push");
            queue.put(record).await?;
            count += 1;
        }
        Ok(count)
    }
}
