//! RecordSink trait - delivery output interface
//!
//! Defines the abstract interface for sinks.

use crate::{ContractError, SinkRole};

/// Record delivery trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(RecordSink: Send)]
pub trait LocalRecordSink {
    /// Role this sink serves (used for logging/metrics/dead-lettering)
    fn role(&self) -> SinkRole;

    /// Attempt delivery of one transformed payload.
    ///
    /// Implementations must acquire a permit from their rate limiter before
    /// initiating any work, and must be safe under concurrent entry.
    ///
    /// Returns `Ok(true)` on success. `Ok(false)` and `Err(_)` are both soft
    /// failures; the dispatcher retries them up to the configured ceiling.
    ///
    /// # Errors
    /// Returns delivery errors (should include context)
    async fn send(&self, payload: &str) -> Result<bool, ContractError>;
}
