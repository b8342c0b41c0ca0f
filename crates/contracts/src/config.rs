//! Relay configuration model.
//!
//! Every field carries a serde default so a partial file (or no file at all)
//! resolves to the documented defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::SinkRole;

/// Top-level relay configuration, constructed at startup and injected into
/// the orchestrator. There are no process-wide mutable globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub sinks: SinksConfig,
    #[serde(default)]
    pub dlq: DlqConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl RelayConfig {
    /// Configured permits-per-second for one role.
    pub fn rate_for(&self, role: SinkRole) -> u32 {
        match role {
            SinkRole::Rest => self.sinks.rest.rate_limit,
            SinkRole::Grpc => self.sinks.grpc.rate_limit,
            SinkRole::Mq => self.sinks.mq.rate_limit,
            SinkRole::Db => self.sinks.db.rate_limit,
        }
    }
}

/// Input artifact selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Source artifact path
    #[serde(default = "default_input_path")]
    pub file_path: PathBuf,
    /// Parser selection
    #[serde(default)]
    pub format: InputFormat,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file_path: default_input_path(),
            format: InputFormat::default(),
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("sample-data/input.json")
}

/// Supported input artifact formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// JSON array of objects
    Json,
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
    /// Pipe- or tab-delimited columns with a header row
    #[serde(rename = "fixedwidth")]
    FixedWidth,
}

/// Bounded record queue sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1000
}

/// Per-role sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinksConfig {
    #[serde(default = "default_rest_sink")]
    pub rest: SinkSettings,
    #[serde(default = "default_grpc_sink")]
    pub grpc: SinkSettings,
    #[serde(default = "default_mq_sink")]
    pub mq: SinkSettings,
    #[serde(default = "default_db_sink")]
    pub db: SinkSettings,
}

impl Default for SinksConfig {
    fn default() -> Self {
        Self {
            rest: default_rest_sink(),
            grpc: default_grpc_sink(),
            mq: default_mq_sink(),
            db: default_db_sink(),
        }
    }
}

/// Settings for a single sink role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkSettings {
    /// Permits per second; send attempts started inside any one-second
    /// window never exceed this
    pub rate_limit: u32,
}

fn default_rest_sink() -> SinkSettings {
    SinkSettings { rate_limit: 50 }
}

fn default_grpc_sink() -> SinkSettings {
    SinkSettings { rate_limit: 200 }
}

fn default_mq_sink() -> SinkSettings {
    SinkSettings { rate_limit: 500 }
}

fn default_db_sink() -> SinkSettings {
    SinkSettings { rate_limit: 1000 }
}

/// Dead-letter capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlqConfig {
    /// Master switch; when off every dead-letter operation is a no-op
    #[serde(default = "default_dlq_enabled")]
    pub enabled: bool,
    /// Line-oriented JSON log path, append-only, never truncated
    #[serde(default = "default_dlq_path")]
    pub file_path: PathBuf,
    /// Retry ceiling per (record, sink)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for DlqConfig {
    fn default() -> Self {
        Self {
            enabled: default_dlq_enabled(),
            file_path: default_dlq_path(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_dlq_enabled() -> bool {
    true
}

fn default_dlq_path() -> PathBuf {
    PathBuf::from("dlq/failed-records.jsonl")
}

fn default_max_retries() -> u32 {
    3
}

/// Periodic reporter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Reporter period in seconds; 0 disables the reporter
    #[serde(default = "default_metrics_interval")]
    pub interval_seconds: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_metrics_interval(),
        }
    }
}

fn default_metrics_interval() -> u64 {
    5
}
