//! MockSink - deterministic sink for tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use contracts::{ContractError, RecordSink, SinkRole};

use crate::rate_limit::RateLimiter;

/// Scripted outcome for every `send`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Always `Ok(true)`
    Succeed,
    /// Always `Ok(false)`
    SoftFail,
    /// Always `Err(SinkSend)`
    Error,
}

/// Deterministic sink: scripted outcome, optional rate limiter, optional
/// latency, and an invocation counter shared with the test.
pub struct MockSink {
    role: SinkRole,
    behavior: MockBehavior,
    limiter: Option<Arc<RateLimiter>>,
    latency: Duration,
    calls: Arc<AtomicU64>,
}

impl MockSink {
    pub fn new(role: SinkRole, behavior: MockBehavior) -> Self {
        Self {
            role,
            behavior,
            limiter: None,
            latency: Duration::ZERO,
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Sink that always delivers.
    pub fn succeeding(role: SinkRole) -> Self {
        Self::new(role, MockBehavior::Succeed)
    }

    /// Sink that always reports a soft failure.
    pub fn soft_failing(role: SinkRole) -> Self {
        Self::new(role, MockBehavior::SoftFail)
    }

    /// Sink that always raises a send error.
    pub fn erroring(role: SinkRole) -> Self {
        Self::new(role, MockBehavior::Error)
    }

    /// Attach a rate limiter; `send` acquires from it like a real sink.
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Add a fixed latency per send.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Shared invocation counter.
    pub fn calls(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.calls)
    }
}

impl RecordSink for MockSink {
    fn role(&self) -> SinkRole {
        self.role
    }

    async fn send(&self, _payload: &str) -> Result<bool, ContractError> {
        if let Some(limiter) = &self.limiter {
            limiter.acquire().await?;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.calls.fetch_add(1, Ordering::Relaxed);

        match self.behavior {
            MockBehavior::Succeed => Ok(true),
            MockBehavior::SoftFail => Ok(false),
            MockBehavior::Error => Err(ContractError::sink_send(self.role, "scripted failure")),
        }
    }
}
