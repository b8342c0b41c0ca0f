//! Error layering
//!
//! Layered by source: config / transform / sink / io

use thiserror::Error;

use crate::SinkRole;

/// Unified error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Transform =====
    /// Transformer rejected a record; terminal for that (record, sink)
    #[error("transform error for {role}: {message}")]
    Transform { role: SinkRole, message: String },

    // ===== Sink =====
    /// Sink send error; counts as a soft failure
    #[error("sink {role} send error: {message}")]
    SinkSend { role: SinkRole, message: String },

    /// Sink worker is gone; counts as a soft failure
    #[error("sink {role} closed")]
    SinkClosed { role: SinkRole },

    /// Rate limiter torn down while a send was waiting for a permit
    #[error("rate limiter closed")]
    RateLimiterClosed,

    // ===== Generic =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transform(role: SinkRole, message: impl Into<String>) -> Self {
        Self::Transform {
            role,
            message: message.into(),
        }
    }

    pub fn sink_send(role: SinkRole, message: impl Into<String>) -> Self {
        Self::SinkSend {
            role,
            message: message.into(),
        }
    }
}
