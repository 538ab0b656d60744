//! # Client Session Configuration
//!
//! Caller-supplied bundle describing how to reach and negotiate with a
//! remote endpoint. Read-only to the dispatcher.

use serde::{Deserialize, Serialize};

use super::handshake::BASE_CAPABILITY;

/// Configuration for one client session attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSessionConfig {
    /// Remote endpoint as `host:port`
    pub address: String,

    /// Credentials handed to the transport factory (TLS/SSH transports)
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Capability URIs advertised in the client hello
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,

    /// Bound on establishing the transport connection (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Bound on the hello exchange (default: 30)
    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,
}

fn default_capabilities() -> Vec<String> {
    vec![BASE_CAPABILITY.to_string()]
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_handshake_timeout_secs() -> u64 {
    30
}

impl ClientSessionConfig {
    /// Create a config for the given endpoint with default capabilities
    /// and timeouts
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            credentials: None,
            capabilities: default_capabilities(),
            connect_timeout_secs: default_connect_timeout_secs(),
            handshake_timeout_secs: default_handshake_timeout_secs(),
        }
    }

    /// Add a capability to the advertisement
    pub fn advertise(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }
}

/// Transport credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Password or key passphrase
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_advertise_base_capability() {
        let config = ClientSessionConfig::with_address("192.0.2.1:830");
        assert_eq!(config.address, "192.0.2.1:830");
        assert_eq!(config.capabilities, vec![BASE_CAPABILITY.to_string()]);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.handshake_timeout_secs, 30);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_advertise_appends() {
        let config = ClientSessionConfig::with_address("192.0.2.1:830")
            .advertise("urn:example:capability:1.0");
        assert_eq!(config.capabilities.len(), 2);
        assert!(config.capabilities.contains(&BASE_CAPABILITY.to_string()));
    }
}
