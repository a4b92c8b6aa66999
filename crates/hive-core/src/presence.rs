//! Participant identity.
//!
//! A presence is a session on a given node. Registries own every presence
//! they track; the values here are built per request from wire fields and
//! dropped once the registry call returns.

use std::fmt;

use uuid::Uuid;

/// Parses a UUID, falling back to the nil UUID for malformed input.
///
/// Identifiers arriving from peers are not validated at the protocol layer;
/// a registry that receives the nil UUID treats it as an unknown entity.
pub fn uuid_or_nil(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap_or(Uuid::nil())
}

/// Identifies one session on one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresenceId {
    /// Node the session is connected to.
    pub node: String,
    /// Session identifier.
    pub session_id: Uuid,
}

impl PresenceId {
    /// Creates a new presence identifier.
    pub fn new(node: impl Into<String>, session_id: Uuid) -> Self {
        Self {
            node: node.into(),
            session_id,
        }
    }
}

impl fmt::Display for PresenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.session_id, self.node)
    }
}

/// A stream a presence is attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PresenceStream {
    pub mode: u32,
    pub subject: Uuid,
    pub subcontext: Uuid,
    pub label: String,
}

/// Metadata attached to a presence on a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceMeta {
    /// Session wire format of the owning connection.
    pub format: u32,
    pub hidden: bool,
    pub persistence: bool,
    pub username: String,
    pub status: String,
    /// Why the presence last changed (join, update, leave, disconnect).
    pub reason: u32,
}

/// A fully described participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub id: PresenceId,
    pub user_id: Uuid,
    /// Unset when the sender supplied no stream.
    pub stream: Option<PresenceStream>,
    /// Unset when the sender supplied no metadata.
    pub meta: Option<PresenceMeta>,
}

impl Presence {
    /// Creates a presence with no stream or metadata.
    pub fn new(id: PresenceId, user_id: Uuid) -> Self {
        Self {
            id,
            user_id,
            stream: None,
            meta: None,
        }
    }

    /// Builder: set the stream.
    pub fn with_stream(mut self, stream: PresenceStream) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Builder: set the metadata.
    pub fn with_meta(mut self, meta: PresenceMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// A user as seen by other members of a party or match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPresence {
    pub user_id: String,
    pub session_id: String,
    pub username: String,
    pub persistence: bool,
    pub status: Option<String>,
}

/// A participant in an authoritative match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPresence {
    pub node: String,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub username: String,
    pub reason: u32,
}
