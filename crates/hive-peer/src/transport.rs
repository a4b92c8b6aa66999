//! Reliable point-to-point delivery.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::membership::Endpoint;

/// Sends one encoded frame to a member and returns once the member has
/// acknowledged it.
///
/// Implementations own any retry or backoff policy. Callers do not retry.
#[async_trait]
pub trait ReliableTransport: Send + Sync {
    async fn send_reliable(&self, endpoint: &Endpoint, payload: Vec<u8>)
    -> Result<(), TransportError>;
}
