//! Peer node: request dispatch, response correlation, reliable transport.
//!
//! This crate provides the node-to-node side of a hive cluster:
//! - Routing of inbound peer requests to the local party and match registries
//! - Correlating responses back to the requesting node's inbox
//! - Issuing requests to peers and awaiting their answers
//! - A TCP transport with per-frame acknowledgement
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hive_peer::{
//!     Collaborators, LocalPeer, MembershipDirectory, PeerConfig, PeerListener, TcpTransport,
//! };
//!
//! async fn serve(collaborators: Collaborators) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PeerConfig::default();
//!     let transport = Arc::new(TcpTransport::from_config(&config));
//!     let listener = PeerListener::bind(&config).await?;
//!     let peer = Arc::new(LocalPeer::new(
//!         config,
//!         MembershipDirectory::new(),
//!         transport,
//!         collaborators,
//!     ));
//!
//!     listener.run(peer).await?;
//!     Ok(())
//! }
//! ```

mod config;
mod correlator;
mod dispatcher;
mod error;
mod inbox;
mod local;
mod membership;
mod peer;
mod registry;
mod tcp;
mod transport;

pub use config::PeerConfig;
pub use correlator::{ResponseCorrelator, UNKNOWN_NODE_MESSAGE};
pub use dispatcher::{Collaborators, Dispatcher, NOT_FOUND_MESSAGE};
pub use error::{BoxError, PeerError, PeerResult, TransportError};
pub use inbox::{InboxGuard, InboxRegistry};
pub use local::{InboundHandler, SessionControl};
pub use membership::{Endpoint, MembershipDirectory};
pub use peer::LocalPeer;
pub use registry::{
    JoinAttempt, JoinAttemptResult, MatchData, MatchDescriptor, MatchRegistry, MatchState,
    MatchmakerParams, MatchmakerTicket, PartyRegistry,
};
pub use tcp::{ACK, PeerListener, TcpTransport};
pub use transport::ReliableTransport;
