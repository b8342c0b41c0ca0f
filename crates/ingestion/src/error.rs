//! Ingestion error types.

use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Input artifact could not be opened
    #[error("failed to open source '{path}': {source}")]
    SourceOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Read failed mid-stream
    #[error("failed to read source '{path}': {source}")]
    SourceRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Queue closed while the producer was still pushing
    #[error("record queue closed")]
    QueueClosed,
}

impl IngestionError {
    pub fn source_open(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceOpen {
            path: path.into(),
            source,
        }
    }

    pub fn source_read(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestionError>;
