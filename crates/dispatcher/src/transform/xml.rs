//! XML envelope for the MQ role.

use contracts::{ContractError, Transformer};

/// Wraps the record in a CDATA message envelope; empty input yields a bare
/// root element.
pub struct XmlTransformer;

impl Transformer for XmlTransformer {
    fn transform(&self, record: &str) -> Result<String, ContractError> {
        if record.is_empty() {
            return Ok("<?xml version=\"1.0\"?><root/>".to_string());
        }

        Ok(format!(
            "<?xml version=\"1.0\"?>\n<message>\n  <data><![CDATA[{record}]]></data>\n</message>"
        ))
    }
}
