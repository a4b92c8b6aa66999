//! A cluster node's view of its peers.
//!
//! `LocalPeer` ties the pieces together: inbound request frames go to the
//! [`Dispatcher`] and, when an answer is due, out through the
//! [`ResponseCorrelator`]; inbound response frames go to the waiting inbox.
//! Outbound requests go through the same correlator.

use std::sync::Arc;

use tracing::{debug, warn};

use hive_protocol::{Frame, Request, ResponseWriter, decode_frame, frame};

use crate::config::PeerConfig;
use crate::correlator::ResponseCorrelator;
use crate::dispatcher::{Collaborators, Dispatcher};
use crate::error::{PeerError, PeerResult};
use crate::inbox::InboxRegistry;
use crate::membership::MembershipDirectory;
use crate::transport::ReliableTransport;

/// The local node's end of the peer protocol.
pub struct LocalPeer {
    config: PeerConfig,
    dispatcher: Dispatcher,
    correlator: ResponseCorrelator,
    inboxes: InboxRegistry,
}

impl LocalPeer {
    /// Creates a peer named by `config.node_name`.
    pub fn new(
        config: PeerConfig,
        members: MembershipDirectory,
        transport: Arc<dyn ReliableTransport>,
        collaborators: Collaborators,
    ) -> Self {
        let dispatcher = Dispatcher::new(config.node_name.clone(), collaborators);
        let correlator = ResponseCorrelator::new(config.node_name.clone(), members, transport);
        Self {
            config,
            dispatcher,
            correlator,
            inboxes: InboxRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.node_name
    }

    pub fn config(&self) -> &PeerConfig {
        &self.config
    }

    pub fn inboxes(&self) -> &InboxRegistry {
        &self.inboxes
    }

    /// Decodes and handles one reliable-send payload.
    pub async fn on_bytes(&self, data: &[u8]) -> PeerResult<()> {
        let frame = decode_frame(data).inspect_err(|e| {
            warn!(error = %e, bytes = data.len(), "Dropping undecodable frame");
        })?;
        self.on_frame(frame).await
    }

    /// Handles one inbound frame.
    ///
    /// For requests, an error means the response could not be delivered;
    /// the registry side effect, if any, has already happened.
    pub async fn on_frame(&self, frame: Frame) -> PeerResult<()> {
        let Frame {
            id,
            inbox,
            node,
            payload,
            ..
        } = frame;

        match payload {
            Some(frame::Payload::Request(request)) => {
                let Some(response) = self.dispatcher.dispatch(&node, request).await else {
                    return Ok(());
                };
                if let Err(status) = self.correlator.respond(&node, &inbox, response).await {
                    warn!(
                        frame_id = %id,
                        origin = %node,
                        error = %status,
                        "Failed to send response"
                    );
                    return Err(status.into());
                }
                Ok(())
            }
            Some(frame::Payload::ResponseWriter(response)) => {
                if !self.inboxes.deliver(&inbox, response) {
                    debug!(
                        frame_id = %id,
                        inbox = %inbox,
                        from = %node,
                        "Response arrived for an inbox no one is waiting on"
                    );
                }
                Ok(())
            }
            None => {
                debug!(frame_id = %id, from = %node, "Ignoring frame without payload");
                Ok(())
            }
        }
    }

    /// Sends a request that wants no response.
    pub async fn send(&self, target_node: &str, request: Request) -> PeerResult<()> {
        let frame = Frame::request(self.name(), "", request);
        self.correlator.deliver(target_node, &frame).await?;
        Ok(())
    }

    /// Sends a request and waits for its response.
    ///
    /// Gives up after the configured request timeout; a response arriving
    /// later is dropped. The inbox is closed on every exit, including when
    /// the caller drops this future early.
    pub async fn request(&self, target_node: &str, request: Request) -> PeerResult<ResponseWriter> {
        let (inbox, rx) = self.inboxes.open();
        let frame = Frame::request(self.name(), inbox.name(), request);

        self.correlator.deliver(target_node, &frame).await?;

        let after = self.config.request_timeout();
        match tokio::time::timeout(after, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(PeerError::InboxClosed {
                inbox: inbox.name().to_string(),
            }),
            Err(_) => Err(PeerError::Timeout {
                node: target_node.to_string(),
                after,
            }),
        }
    }
}
