//! JSON normalization for the REST role.

use contracts::{ContractError, Transformer};

/// Trims the record and substitutes an empty object for empty input. The
/// record itself is not parsed; the core treats payloads as opaque text.
pub struct JsonTransformer;

impl Transformer for JsonTransformer {
    fn transform(&self, record: &str) -> Result<String, ContractError> {
        let trimmed = record.trim();
        if trimmed.is_empty() {
            return Ok("{}".to_string());
        }
        Ok(trimmed.to_string())
    }
}
