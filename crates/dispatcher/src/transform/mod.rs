//! Transformer implementations and the role registry.
//!
//! One encoding per sink role: JSON normalization for REST, a protobuf-style
//! frame for GRPC, an XML envelope for MQ, and an Avro-style container for
//! DB. Roles without a registered transformer pass records through unchanged.

mod avro;
mod json;
mod proto;
mod xml;

pub use self::avro::AvroTransformer;
pub use self::json::JsonTransformer;
pub use self::proto::ProtoTransformer;
pub use self::xml::XmlTransformer;

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use contracts::{SinkRole, Transformer};

/// Role-keyed transformer lookup.
pub struct TransformerRegistry {
    map: HashMap<SinkRole, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// Empty registry; every role passes through.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// The standard role-to-encoding mapping.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(SinkRole::Rest, Arc::new(JsonTransformer));
        registry.register(SinkRole::Grpc, Arc::new(ProtoTransformer));
        registry.register(SinkRole::Mq, Arc::new(XmlTransformer));
        registry.register(SinkRole::Db, Arc::new(AvroTransformer));
        registry
    }

    /// Register (or replace) the transformer for one role.
    pub fn register(&mut self, role: SinkRole, transformer: Arc<dyn Transformer>) {
        self.map.insert(role, transformer);
    }

    /// Transformer for a role, if one is registered.
    pub fn get(&self, role: SinkRole) -> Option<Arc<dyn Transformer>> {
        self.map.get(&role).cloned()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercase hex rendering shared by the binary-style encoders.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // write! into a String cannot fail
        let _ = write!(out, "{byte:02x}");
    }
    out
}
