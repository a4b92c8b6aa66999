//! Hooks into subsystems that live on this node only.

use async_trait::async_trait;
use uuid::Uuid;

use hive_protocol::Envelope;

/// Processes a realtime message forwarded by another node as if it had
/// been produced locally.
#[async_trait]
pub trait InboundHandler: Send + Sync {
    async fn handle(&self, envelope: Envelope);
}

/// Session enforcement primitives.
#[async_trait]
pub trait SessionControl: Send + Sync {
    /// Closes every local session of `user_id` except `keep_session_id`.
    async fn single_socket(&self, user_id: Uuid, keep_session_id: Uuid);

    /// Forcibly closes a local session.
    async fn disconnect(&self, session_id: Uuid, reason: u32, message: &str);
}
