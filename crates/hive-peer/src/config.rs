//! Peer node configuration.
//!
//! Settings live in a TOML file; every key is optional:
//!
//! ```toml
//! node_name = "eu-1"
//! bind_address = "0.0.0.0:7352"
//! request_timeout_ms = 5000
//! connection_timeout_ms = 3000
//! max_connections = 256
//! ```

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use hive_core::match_id::NAMESPACE_SEPARATOR;

use crate::error::{PeerError, PeerResult};

/// Configuration for a peer node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Cluster-unique node name; also the namespace of locally owned matches.
    pub node_name: String,

    /// Address the peer listener binds to.
    pub bind_address: SocketAddr,

    /// How long `request` waits for a response.
    pub request_timeout_ms: u64,

    /// Bound on each connect, write and acknowledgement step.
    pub connection_timeout_ms: u64,

    /// Maximum concurrent inbound peer connections.
    pub max_connections: usize,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            node_name: "hive".to_string(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 7352)),
            request_timeout_ms: 5_000,
            connection_timeout_ms: 3_000,
            max_connections: 256,
        }
    }
}

impl PeerConfig {
    /// Creates a configuration for the given node name.
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Default::default()
        }
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> PeerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PeerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            PeerError::config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the node name can namespace match identifiers.
    pub fn validate(&self) -> PeerResult<()> {
        if self.node_name.is_empty() {
            return Err(PeerError::config("node_name must not be empty"));
        }
        if self.node_name.contains(NAMESPACE_SEPARATOR) {
            return Err(PeerError::config(format!(
                "node_name must not contain '{}': {}",
                NAMESPACE_SEPARATOR, self.node_name
            )));
        }
        if self.max_connections == 0 {
            return Err(PeerError::config("max_connections must be at least 1"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// Builder: set bind address.
    pub fn with_bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Builder: set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Builder: set connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Builder: set max connections.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }
}
