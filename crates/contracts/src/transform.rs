//! Transformer trait - per-role payload encoding.

use crate::ContractError;

/// Pure record-to-payload encoding, one implementation per sink role.
///
/// Must be referentially transparent per input. An empty input yields a
/// well-formed empty encoding defined by the implementation. An error is
/// terminal for that (record, sink): the dispatcher records it with zero
/// attempts and never calls `send`.
pub trait Transformer: Send + Sync {
    /// Encode one record.
    ///
    /// # Errors
    /// Returns an encoding error; the record is dead-lettered without a send.
    fn transform(&self, record: &str) -> Result<String, ContractError>;
}
