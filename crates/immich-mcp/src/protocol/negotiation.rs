//! Protocol version negotiation during `initialize`.

use crate::types::{
    ClientCapabilities, Implementation, InitializeParams, InitializeResult, MCP_VERSION,
    SUPPORTED_VERSIONS,
};

/// What the client told us during the handshake.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: ClientCapabilities,
    pub client_info: Option<Implementation>,
    pub protocol_version: Option<String>,
    pub initialized: bool,
}

/// Pick the revision to speak: the client's if we support it, else our newest.
pub fn select_version(requested: &str) -> &'static str {
    SUPPORTED_VERSIONS
        .iter()
        .copied()
        .find(|v| *v == requested)
        .unwrap_or(MCP_VERSION)
}

impl NegotiatedCapabilities {
    pub fn negotiate(&mut self, params: InitializeParams) -> InitializeResult {
        let version = select_version(&params.protocol_version);
        if version != params.protocol_version {
            tracing::warn!(
                "Client requested protocol version {}, answering with {}",
                params.protocol_version,
                version
            );
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );

        self.client = params.capabilities;
        self.client_info = Some(params.client_info);
        self.protocol_version = Some(version.to_string());

        InitializeResult::for_version(version)
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(version: &str) -> InitializeParams {
        InitializeParams {
            protocol_version: version.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "test-client".to_string(),
                version: "1.0".to_string(),
            },
        }
    }

    #[test]
    fn supported_versions_are_echoed() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(params("2024-11-05"));
        assert_eq!(result.protocol_version, "2024-11-05");
        assert_eq!(caps.protocol_version.as_deref(), Some("2024-11-05"));
    }

    #[test]
    fn unknown_versions_get_the_newest() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(params("1999-01-01"));
        assert_eq!(result.protocol_version, MCP_VERSION);
        assert!(!caps.initialized);
        caps.mark_initialized();
        assert!(caps.initialized);
    }
}
