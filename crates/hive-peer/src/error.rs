//! Peer error types.

use std::io;
use std::time::Duration;

use thiserror::Error;

use hive_protocol::{ProtocolError, Status};

/// Result type for peer operations.
pub type PeerResult<T> = Result<T, PeerError>;

/// Error type registries report. Rendered into an error envelope: a
/// [`Status`] keeps its code, any other error is opaque and sent as
/// [`hive_protocol::Code::Unknown`] with its message.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by a [`crate::ReliableTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The remote closed the connection before acknowledging.
    #[error("no acknowledgement from {address}")]
    MissingAck { address: String },

    #[error("timeout during {operation}")]
    Timeout { operation: &'static str },
}

/// Errors that can occur in a peer node.
#[derive(Debug, Error)]
pub enum PeerError {
    /// A routing or delivery failure with a canonical code.
    #[error("{0}")]
    Status(#[from] Status),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    /// No response arrived in time.
    #[error("request to {node} timed out after {after:?}")]
    Timeout { node: String, after: Duration },

    /// The inbox was dropped before a response arrived.
    #[error("inbox {inbox} closed without a response")]
    InboxClosed { inbox: String },
}

impl PeerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The status carried by this error, if it is a routing failure.
    pub fn as_status(&self) -> Option<&Status> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }
}
