//! MCP capability negotiation during initialization.

use serde_json::{Map, Value};

use crate::types::{Implementation, InitializeParams, InitializeResult, McpResult, MCP_VERSION};

/// Client details recorded during the handshake.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: Map<String, Value>,
    pub client_info: Option<Implementation>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );

        self.client = params.capabilities;
        self.client_info = Some(params.client_info);

        Ok(InitializeResult::default_result())
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiate_records_client() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps
            .negotiate(InitializeParams {
                protocol_version: "2099-01-01".to_string(),
                capabilities: Map::new(),
                client_info: Implementation {
                    name: "test-client".to_string(),
                    version: "1.0".to_string(),
                },
            })
            .unwrap();

        assert_eq!(result.protocol_version, MCP_VERSION);
        assert_eq!(caps.client_info.map(|c| c.name).as_deref(), Some("test-client"));
        assert!(!caps.initialized);
    }
}
