//! Sink roles - stable identifiers for the downstream slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named slot selecting both a sink implementation and a transformer.
///
/// Roles are process-lifetime constants; metrics and dead-letter entries
/// are keyed by them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkRole {
    /// REST endpoint delivery
    Rest,
    /// gRPC endpoint delivery
    Grpc,
    /// Message broker delivery
    Mq,
    /// Wide-column database delivery
    Db,
}

impl SinkRole {
    /// All roles, in registration order.
    pub const ALL: [SinkRole; 4] = [SinkRole::Rest, SinkRole::Grpc, SinkRole::Mq, SinkRole::Db];

    /// Canonical upper-case name used in logs and dead-letter lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkRole::Rest => "REST",
            SinkRole::Grpc => "GRPC",
            SinkRole::Mq => "MQ",
            SinkRole::Db => "DB",
        }
    }
}

impl fmt::Display for SinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(SinkRole::Rest.as_str(), "REST");
        assert_eq!(SinkRole::Db.to_string(), "DB");
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&SinkRole::Mq).unwrap();
        assert_eq!(json, "\"mq\"");
        let role: SinkRole = serde_json::from_str("\"grpc\"").unwrap();
        assert_eq!(role, SinkRole::Grpc);
    }
}
