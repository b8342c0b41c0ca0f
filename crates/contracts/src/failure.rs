//! Durable description of a terminal delivery failure.

use chrono::Utc;
use serde_json::Value;

use crate::SinkRole;

/// One terminal failure of a (record, sink) pair.
///
/// Owned jointly by the dead-letter roster and the durable file; the file is
/// authoritative.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// Original record, verbatim
    pub record: String,
    /// Role that failed
    pub sink: SinkRole,
    /// Retry ceiling when retries were exhausted, 0 when the transform failed
    pub attempts: u32,
    /// Human-readable failure reason
    pub error: String,
    /// ISO-8601 UTC capture time
    pub timestamp: String,
}

impl FailureRecord {
    /// Capture a failure now.
    pub fn new(
        record: impl Into<String>,
        sink: SinkRole,
        attempts: u32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            sink,
            attempts,
            error: error.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Render the line-oriented JSON form.
    ///
    /// The `record` field is spliced in verbatim, not re-quoted: when the
    /// record is itself a JSON object the line stays valid JSON, and when it
    /// is not the line is malformed on purpose - the log is a best-effort
    /// capture of raw bytes.
    pub fn to_json_line(&self) -> String {
        format!(
            "{{\"record\":{},\"sink\":{},\"attempts\":{},\"error\":{},\"timestamp\":{}}}",
            self.record,
            Value::from(self.sink.as_str()),
            self.attempts,
            Value::from(self.error.as_str()),
            Value::from(self.timestamp.as_str()),
        )
    }
}
