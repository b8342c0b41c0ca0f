//! # Ingestion
//!
//! Record ingestion module.
//!
//! Responsibilities:
//! - Own the bounded record queue between producers and the dispatcher
//! - Stream records out of file artifacts (jsonl / json / csv / fixedwidth)
//! - Provide a mock in-memory source for tests
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{FileSource, RecordQueue, spawn_source};
//!
//! let queue = RecordQueue::new(1000);
//! let source = FileSource::from_config(&config.input);
//! let producer = spawn_source(source, queue.clone());
//!
//! while let Some(record) = queue.poll(POLL_TIMEOUT).await {
//!     // fan the record out
//! }
//! ```

mod error;
mod file;
mod mock;
mod queue;
mod source;

pub use error::{IngestionError, Result};
pub use file::FileSource;
pub use mock::MockSource;
pub use queue::RecordQueue;
pub use source::{spawn_source, LocalRecordSource, RecordSource};
