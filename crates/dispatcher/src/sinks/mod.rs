//! Sink implementations
//!
//! Contains the simulated role sinks and a deterministic mock for tests.

mod mock;
mod simulated;

pub use self::mock::{MockBehavior, MockSink};
pub use self::simulated::SimulatedSink;
