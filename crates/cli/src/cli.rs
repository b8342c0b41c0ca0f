//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fan-Out Relay - concurrent record fan-out to rate-limited sinks
#[derive(Parser, Debug)]
#[command(
    name = "fanout-relay",
    author,
    version,
    about = "Fan-out relay for record streams",
    long_about = "Reads a stream of records from a file artifact, applies a per-sink \n\
                  transformation to each record, and concurrently delivers every record \n\
                  to every configured sink under per-sink rate limits, with bounded \n\
                  retries and durable dead-letter capture of terminal failures."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "FANOUT_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "FANOUT_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fan-out pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "relay.toml", env = "FANOUT_RELAY_CONFIG")]
    pub config: PathBuf,

    /// Bounded test mode: process a fixed number of records, then stop
    #[arg(long = "testMode", alias = "test-mode")]
    pub test_mode: bool,

    /// Record budget for bounded test mode
    #[arg(long, default_value = "5", env = "FANOUT_RELAY_RECORDS")]
    pub records: u64,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "FANOUT_RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Print the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
