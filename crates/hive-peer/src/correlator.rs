//! Sends responses back to the inbox a requester named.
//!
//! Answering is a separate, independently failable step from the registry
//! call that produced the answer: a delivery failure never undoes the
//! mutation, and nothing here retries.

use std::sync::Arc;

use tracing::debug;

use hive_protocol::{Frame, ResponseWriter, Status, encode_frame};

use crate::membership::MembershipDirectory;
use crate::transport::ReliableTransport;

/// Message of the error returned when a frame's target is not a member.
pub const UNKNOWN_NODE_MESSAGE: &str = "the remote node does not exist";

/// Wraps responses in frames and reliably sends them to their requester.
#[derive(Clone)]
pub struct ResponseCorrelator {
    node: String,
    members: MembershipDirectory,
    transport: Arc<dyn ReliableTransport>,
}

impl ResponseCorrelator {
    pub fn new(
        node: impl Into<String>,
        members: MembershipDirectory,
        transport: Arc<dyn ReliableTransport>,
    ) -> Self {
        Self {
            node: node.into(),
            members,
            transport,
        }
    }

    /// Answers a request that arrived from `origin_node` naming `inbox`.
    ///
    /// Does nothing when `inbox` is empty. Otherwise builds a fresh frame
    /// stamped with this node's name and sends it to `origin_node`. Every
    /// failure is reported as [`hive_protocol::Code::Aborted`].
    pub async fn respond(
        &self,
        origin_node: &str,
        inbox: &str,
        response: ResponseWriter,
    ) -> Result<(), Status> {
        if inbox.is_empty() {
            return Ok(());
        }

        let frame = Frame::response(self.node.as_str(), inbox, response);
        self.deliver(origin_node, &frame).await
    }

    /// Resolves `target_node`, encodes `frame` and sends it reliably.
    pub async fn deliver(&self, target_node: &str, frame: &Frame) -> Result<(), Status> {
        let endpoint = self
            .members
            .lookup(target_node)
            .await
            .ok_or_else(|| Status::aborted(UNKNOWN_NODE_MESSAGE))?;

        let bytes = encode_frame(frame).map_err(|e| Status::aborted(e.to_string()))?;
        let size = bytes.len();

        self.transport
            .send_reliable(&endpoint, bytes)
            .await
            .map_err(|e| Status::aborted(e.to_string()))?;

        debug!(
            target = %endpoint.name,
            frame_id = %frame.id,
            inbox = %frame.inbox,
            bytes = size,
            "Frame sent"
        );
        Ok(())
    }
}
