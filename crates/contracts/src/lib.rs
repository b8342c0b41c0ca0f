//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Delivery model
//! - A record is an opaque text payload; the core never parses it
//! - Delivery is at-least-once attempted per (record, sink); terminal failures
//!   land in the dead-letter log

mod config;
mod error;
mod failure;
mod role;
mod sink;
mod transform;

pub use config::*;
pub use error::*;
pub use failure::FailureRecord;
pub use role::SinkRole;
pub use sink::*;
pub use transform::Transformer;
