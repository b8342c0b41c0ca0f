//! SimulatedSink - stand-in delivery with realistic latency and flakiness.
//!
//! Concrete sink I/O (HTTP clients, gRPC channels, broker producers, database
//! drivers) lives behind the `RecordSink` capability; this simulation models
//! their observable behaviour - a per-role latency and a soft-failure
//! probability - so the fan-out fabric can be exercised end to end.

use std::sync::Arc;
use std::time::Duration;

use contracts::{ContractError, RecordSink, SinkRole};
use tracing::{instrument, trace};

use crate::rate_limit::RateLimiter;

/// Rate-limited simulated sink for one role.
pub struct SimulatedSink {
    role: SinkRole,
    limiter: Arc<RateLimiter>,
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedSink {
    /// Create a sink with explicit latency and failure probability.
    pub fn new(
        role: SinkRole,
        limiter: Arc<RateLimiter>,
        latency: Duration,
        failure_rate: f64,
    ) -> Self {
        Self {
            role,
            limiter,
            latency,
            failure_rate,
        }
    }

    /// REST endpoint profile: ~20 ms per call, 10% soft failures.
    pub fn rest(limiter: Arc<RateLimiter>) -> Self {
        Self::new(SinkRole::Rest, limiter, Duration::from_millis(20), 0.10)
    }

    /// gRPC endpoint profile: ~15 ms per call, 10% soft failures.
    pub fn grpc(limiter: Arc<RateLimiter>) -> Self {
        Self::new(SinkRole::Grpc, limiter, Duration::from_millis(15), 0.10)
    }

    /// Message broker profile: ~10 ms per call, 5% soft failures.
    pub fn mq(limiter: Arc<RateLimiter>) -> Self {
        Self::new(SinkRole::Mq, limiter, Duration::from_millis(10), 0.05)
    }

    /// Wide-column database profile: ~5 ms per call, 2% soft failures.
    pub fn db(limiter: Arc<RateLimiter>) -> Self {
        Self::new(SinkRole::Db, limiter, Duration::from_millis(5), 0.02)
    }

    /// Build the sink matching `role` with its standard profile.
    pub fn for_role(role: SinkRole, limiter: Arc<RateLimiter>) -> Self {
        match role {
            SinkRole::Rest => Self::rest(limiter),
            SinkRole::Grpc => Self::grpc(limiter),
            SinkRole::Mq => Self::mq(limiter),
            SinkRole::Db => Self::db(limiter),
        }
    }
}

impl RecordSink for SimulatedSink {
    fn role(&self) -> SinkRole {
        self.role
    }

    #[instrument(name = "simulated_sink_send", skip(self, payload), fields(sink = %self.role, payload_len = payload.len()))]
    async fn send(&self, payload: &str) -> Result<bool, ContractError> {
        self.limiter.acquire().await?;
        tokio::time::sleep(self.latency).await;

        let ok = rand::random::<f64>() >= self.failure_rate;
        trace!(sink = %self.role, ok, "simulated delivery resolved");
        Ok(ok)
    }
}
