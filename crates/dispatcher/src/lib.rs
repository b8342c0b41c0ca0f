//! # Dispatcher
//!
//! Record fan-out module.
//!
//! Responsibilities:
//! - Drain the bounded record queue
//! - Fan each record out to every configured sink under per-sink rate limits
//! - Retry soft failures up to the configured ceiling
//! - Capture terminal failures in the dead-letter sink
//! - Account every outcome in the pipeline metrics

pub mod dispatch;
pub mod dispatcher;
pub mod dlq;
pub mod handle;
pub mod metrics;
pub mod rate_limit;
pub mod sinks;
pub mod transform;

pub use contracts::{ContractError, FailureRecord, RecordSink, SinkRole, Transformer};
pub use dispatch::{dispatch_record, DispatchContext};
pub use dispatcher::{DrainStats, FanOutDispatcher, RunMode, POLL_TIMEOUT, SHUTDOWN_BUDGET};
pub use dlq::DeadLetterSink;
pub use handle::{SinkClient, SinkHandle};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use rate_limit::{spawn_refill, RateLimiter};
pub use sinks::{MockSink, SimulatedSink};
pub use transform::TransformerRegistry;
