//! Protobuf-style framing for the GRPC role.

use contracts::{ContractError, Transformer};

use super::hex_encode;

/// Renders a length-delimited field frame in hex: tag byte `0x0a`, payload
/// length, then the payload bytes. Empty input yields just the frame header.
pub struct ProtoTransformer;

impl Transformer for ProtoTransformer {
    fn transform(&self, record: &str) -> Result<String, ContractError> {
        let data = record.as_bytes();
        Ok(format!("0x0a{:02x}{}", data.len(), hex_encode(data)))
    }
}
