//! Per-sink rate limiting.
//!
//! Windowed quota, not a leaky bucket: a refill tick restores the permit
//! count to capacity once per second and any unused permits from the previous
//! window are discarded. The bucket starts full, so the first second can
//! absorb a burst up to capacity.

use std::sync::Arc;
use std::time::Duration;

use contracts::ContractError;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

/// Permit store consumed before each send attempt.
///
/// The constructor has no side effects; the owning orchestrator starts the
/// refill tick via [`spawn_refill`] and stops it at shutdown.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    permits: Semaphore,
}

impl RateLimiter {
    /// Create a limiter with a full bucket of `capacity` permits.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            permits: Semaphore::new(capacity),
        }
    }

    /// Consume one permit, suspending until one is available.
    ///
    /// Cancellation-safe: a dropped `acquire` future consumes nothing.
    ///
    /// # Errors
    /// Returns `RateLimiterClosed` if the semaphore was closed; never happens
    /// in normal operation.
    pub async fn acquire(&self) -> Result<(), ContractError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ContractError::RateLimiterClosed)?;
        permit.forget();
        Ok(())
    }

    /// Restore the permit count to capacity.
    ///
    /// Not cumulative: permits left over from the closing window are simply
    /// carried into the count that gets topped up, never beyond capacity.
    pub fn refill(&self) {
        let available = self.permits.available_permits();
        if available < self.capacity {
            self.permits.add_permits(self.capacity - available);
        }
    }

    /// Permits currently available.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Configured permits per window.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Spawn the once-per-second refill tick for one limiter.
///
/// Owned by the orchestrator lifecycle; abort the returned handle at
/// shutdown. A tick delayed by the scheduler is not compensated.
pub fn spawn_refill(limiter: Arc<RateLimiter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; the bucket is already full at start
        tick.tick().await;
        loop {
            tick.tick().await;
            limiter.refill();
            trace!(capacity = limiter.capacity(), "rate limiter refilled");
        }
    })
}
