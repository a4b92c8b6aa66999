//! Read-mostly view of cluster membership.
//!
//! The directory maps node names to reachable endpoints. It is written only
//! by the membership subsystem (gossip, static seeding, tests) and read
//! concurrently by every dispatch that needs to answer a peer.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::RwLock;

/// A reachable cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Node name, unique across the cluster.
    pub name: String,
    /// Address the member's peer listener accepts frames on.
    pub address: SocketAddr,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, address: SocketAddr) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Shared node-name to endpoint map. Cloning shares the same map.
#[derive(Debug, Clone, Default)]
pub struct MembershipDirectory {
    members: Arc<RwLock<HashMap<String, Endpoint>>>,
}

impl MembershipDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a node name to its endpoint.
    pub async fn lookup(&self, name: &str) -> Option<Endpoint> {
        self.members.read().await.get(name).cloned()
    }

    /// Adds or replaces a member. Returns the endpoint it replaced.
    pub async fn upsert(&self, endpoint: Endpoint) -> Option<Endpoint> {
        self.members
            .write()
            .await
            .insert(endpoint.name.clone(), endpoint)
    }

    /// Removes a member that left or was declared dead.
    pub async fn remove(&self, name: &str) -> Option<Endpoint> {
        self.members.write().await.remove(name)
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }
}
