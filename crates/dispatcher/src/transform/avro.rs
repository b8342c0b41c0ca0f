//! Avro-style container framing for the DB role.

use contracts::{ContractError, Transformer};

use super::hex_encode;

/// Renders an Avro-flavoured object container in hex: the `Obj\x01` magic,
/// a 32-bit payload length, the payload bytes, and a fixed sync marker.
pub struct AvroTransformer;

const MAGIC: &str = "0x4f626a01";
const SYNC_MARKER: &str = "deadbeefcafebabe";

impl Transformer for AvroTransformer {
    fn transform(&self, record: &str) -> Result<String, ContractError> {
        let data = record.as_bytes();
        Ok(format!(
            "{MAGIC}{:08x}{}{SYNC_MARKER}",
            data.len(),
            hex_encode(data)
        ))
    }
}
